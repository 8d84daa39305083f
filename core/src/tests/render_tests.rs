use pretty_assertions::assert_eq;

use crate::hardware::renderer::{render_screen, BlockRect, FrameBuffer, RenderUpdate};
use crate::hardware::vram::FONT_WIDTH;
use crate::tests::*;
use crate::CdgDecoder;

fn block(x: usize, y: usize) -> BlockRect {
    BlockRect::for_block(x, y).unwrap()
}

/// Every row byte differs a little per block, so a misplaced block would show.
fn block_rows(x: u8, y: u8) -> [u8; 12] {
    let mut rows = [0; 12];
    for (i, row) in rows.iter_mut().enumerate() {
        *row = (x.wrapping_mul(7) ^ y.wrapping_mul(13) ^ (i as u8 * 5)) & 0x3F;
    }
    rows
}

#[test]
fn test_block_render_matches_full_render() {
    let mut packs = vec![load_clut(false, &TEST_CLUT), memory_preset(3)];
    for y in 0..18u8 {
        for x in 0..50u8 {
            packs.push(copy_font((x % 8, (x + y) % 8), x, y, &block_rows(x, y)));
        }
    }
    let input = stream(&packs);
    let mut decoder = CdgDecoder::default();
    let mut partial_frame = FrameBuffer::new();

    decoder.decode_to(&input, 2).unwrap();
    assert_eq!(decoder.render_frame(&mut partial_frame), RenderUpdate::Full);

    decoder.decode_to(&input, packs.len()).unwrap();
    let update = decoder.render_frame(&mut partial_frame);
    match update {
        RenderUpdate::Blocks(blocks) => {
            assert_eq!(blocks.len(), 48 * 16);
            assert_eq!(blocks[0], block(1, 1));
        }
        other => panic!("Expected block updates, got {:?}", other),
    }

    let mut full_frame = FrameBuffer::new();
    render_screen(decoder.vram(), decoder.palette(), &mut full_frame);
    assert!(partial_frame == full_frame, "Block and full rendering disagree");
    assert_eq!(decoder.render_frame(&mut partial_frame), RenderUpdate::Unchanged);
}

#[test]
fn test_single_block_rectangle() {
    let packs = [
        load_clut(false, &TEST_CLUT),
        copy_font((0x4, 0x1), 12, 9, &[0x3F, 0x00, 0x20, 0x01, 0x3F, 0x00, 0x3F, 0x00, 0x3F, 0x00, 0x3F, 0x00]),
    ];
    let mut decoder = decoded(&packs[..1]);
    let mut frame = FrameBuffer::new();
    decoder.render_frame(&mut frame);

    decoder.decode_to(&stream(&packs), 2).unwrap();
    let rect = block(12, 9);
    assert_eq!(decoder.render_frame(&mut frame), RenderUpdate::Blocks(vec![rect]));

    let white = [0xFF, 0xFF, 0xFF, 0xFF];
    let red = [0xFF, 0x00, 0x00, 0xFF];
    assert_eq!(frame.pixel(rect.x, rect.y), white);
    assert_eq!(frame.pixel(rect.x + 5, rect.y + 1), red);
    assert_eq!(frame.pixel(rect.x, rect.y + 2), white);
    assert_eq!(frame.pixel(rect.x + 1, rect.y + 2), red);
    assert_eq!(frame.pixel(rect.x + 5, rect.y + 3), white);
    // Neighbours are untouched palette index 0.
    assert_eq!(frame.pixel(rect.x - 1, rect.y), [0, 0, 0, 0xFF]);
    assert_eq!(frame.pixel(rect.x + FONT_WIDTH, rect.y), [0, 0, 0, 0xFF]);

    let copied = frame.copy_rect(rect);
    assert_eq!(copied.len(), 6 * 12 * 4);
    assert_eq!(&copied[..4], &white);
}

#[test]
fn test_border_change_renders_full_frame() {
    let packs = [load_clut(false, &TEST_CLUT), border_preset(1)];
    let mut decoder = decoded(&packs[..1]);
    let mut frame = FrameBuffer::new();
    decoder.render_frame(&mut frame);

    decoder.decode_to(&stream(&packs), 2).unwrap();
    assert!(decoder.dirty().border_dirty());
    assert!(!decoder.dirty().screen_dirty());
    assert!(!decoder.dirty().any_block_dirty());

    assert_eq!(decoder.render_frame(&mut frame), RenderUpdate::Full);
    assert!(decoder.dirty().is_clean());
}

#[test]
fn test_offscreen_blocks_are_not_rendered() {
    let mut decoder = decoded(&[load_clut(false, &TEST_CLUT)]);
    let mut frame = FrameBuffer::new();
    decoder.render_frame(&mut frame);

    let input = stream(&[load_clut(false, &TEST_CLUT), copy_font((0x4, 0x4), 0, 0, &[0x3F; 12])]);
    decoder.decode_to(&input, 2).unwrap();

    assert_eq!(decoder.render_frame(&mut frame), RenderUpdate::Unchanged);
    assert!(decoder.dirty().is_block_dirty(0, 0));
}

#[test]
fn test_present_partial_sink() {
    let packs = [
        memory_preset(0),
        copy_font((0x1, 0x0), 1, 1, &[0x3F; 12]),
        copy_font((0x1, 0x0), 2, 1, &[0x3F; 12]),
    ];
    let input = stream(&packs);
    let mut decoder = CdgDecoder::default();
    let mut frame = FrameBuffer::new();
    let mut sink = RecordingSink {
        partial: true,
        ..Default::default()
    };

    decoder.decode_to(&input, 1).unwrap();
    assert_eq!(decoder.present(&mut frame, &mut sink), RenderUpdate::Full);
    assert_eq!(sink.full_presents, 1);

    decoder.decode_to(&input, 3).unwrap();
    decoder.present(&mut frame, &mut sink);
    assert_eq!(sink.blocks, vec![block(1, 1), block(2, 1)]);
    assert_eq!(sink.full_presents, 1);

    assert_eq!(decoder.present(&mut frame, &mut sink), RenderUpdate::Unchanged);
    assert_eq!(sink.blocks.len(), 2);
}

#[test]
fn test_present_full_sink_flushes_once() {
    let packs = [
        memory_preset(0),
        copy_font((0x1, 0x0), 1, 1, &[0x3F; 12]),
        copy_font((0x1, 0x0), 2, 1, &[0x3F; 12]),
    ];
    let input = stream(&packs);
    let mut decoder = decoded(&packs[..1]);
    let mut frame = FrameBuffer::new();
    let mut sink = RecordingSink::default();
    decoder.present(&mut frame, &mut sink);

    decoder.decode_to(&input, 3).unwrap();
    let update = decoder.present(&mut frame, &mut sink);

    assert_eq!(
        update,
        RenderUpdate::Blocks(vec![block(1, 1), block(2, 1)])
    );
    assert_eq!(sink.full_presents, 2);
    assert!(sink.blocks.is_empty());

    decoder.present(&mut frame, &mut sink);
    assert_eq!(sink.full_presents, 2);
}

#[test]
fn test_render_is_idempotent() {
    let mut decoder = decoded(&[load_clut(false, &TEST_CLUT), memory_preset(5)]);
    let mut frame = FrameBuffer::new();
    decoder.render_frame(&mut frame);
    let first = frame.clone();
    let rows = decoder.vram().rows().to_vec();
    let palette = *decoder.palette();

    assert_eq!(decoder.render_frame(&mut frame), RenderUpdate::Unchanged);
    assert!(frame == first);
    assert_eq!(decoder.vram().rows(), &rows[..]);
    assert_eq!(decoder.palette(), &palette);
}
