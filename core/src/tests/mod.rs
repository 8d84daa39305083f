use crate::hardware::pack::*;
use crate::hardware::renderer::{BlockRect, DisplaySink, FrameBuffer};
use crate::CdgDecoder;

mod render_tests;

// Common functionality for the tests.

pub fn graphics_pack(instruction: u8, data: &[u8]) -> [u8; PACK_SIZE] {
    let mut pack = [0; PACK_SIZE];
    pack[0] = TV_GRAPHICS;
    pack[1] = instruction;
    pack[4..4 + data.len()].copy_from_slice(data);
    pack
}

pub fn memory_preset(colour: u8) -> [u8; PACK_SIZE] {
    graphics_pack(MEMORY_PRESET, &[colour])
}

pub fn border_preset(colour: u8) -> [u8; PACK_SIZE] {
    graphics_pack(BORDER_PRESET, &[colour])
}

pub fn load_clut(high: bool, data: &[u8; 16]) -> [u8; PACK_SIZE] {
    graphics_pack(if high { LOAD_CLUT_HI } else { LOAD_CLUT_LO }, data)
}

pub fn font_on_channel(xor: bool, channel: u8, colours: (u8, u8), x: u8, y: u8, rows: &[u8; 12]) -> [u8; PACK_SIZE] {
    let mut data = [0; 16];
    data[0] = (colours.0 & 0xF) | ((channel & 0xC) << 2);
    data[1] = (colours.1 & 0xF) | ((channel & 0x3) << 4);
    data[2] = y;
    data[3] = x;
    data[4..].copy_from_slice(rows);
    graphics_pack(if xor { XOR_FONT } else { COPY_FONT }, &data)
}

pub fn copy_font(colours: (u8, u8), x: u8, y: u8, rows: &[u8; 12]) -> [u8; PACK_SIZE] {
    font_on_channel(false, 0, colours, x, y, rows)
}

pub fn xor_font(colours: (u8, u8), x: u8, y: u8, rows: &[u8; 12]) -> [u8; PACK_SIZE] {
    font_on_channel(true, 0, colours, x, y, rows)
}

/// `horizontal` and `vertical` are the raw 2-bit direction codes.
pub fn scroll(copy: bool, colour: u8, horizontal: u8, vertical: u8) -> [u8; PACK_SIZE] {
    graphics_pack(
        if copy { SCROLL_COPY } else { SCROLL_PRESET },
        &[colour, horizontal << 4, vertical << 4],
    )
}

pub fn stream(packs: &[[u8; PACK_SIZE]]) -> Vec<u8> {
    packs.iter().flat_map(|pack| pack.iter().copied()).collect()
}

pub fn decoded(packs: &[[u8; PACK_SIZE]]) -> CdgDecoder {
    let mut decoder = CdgDecoder::default();
    decoder
        .decode_to(&stream(packs), packs.len())
        .expect("Test stream should be complete");
    decoder
}

/// A handful of distinct colours in the low CLUT half.
pub const TEST_CLUT: [u8; 16] = [
    0x00, 0x00, 0x3C, 0x00, 0x03, 0x30, 0x00, 0x0F, 0x3F, 0x3F, 0x15, 0x2A, 0x2A, 0x15, 0x10, 0x08,
];

#[derive(Default)]
pub struct RecordingSink {
    pub partial: bool,
    pub full_presents: usize,
    pub blocks: Vec<BlockRect>,
}

impl DisplaySink for RecordingSink {
    fn supports_partial_updates(&self) -> bool {
        self.partial
    }

    fn present_full(&mut self, _frame: &FrameBuffer) {
        self.full_presents += 1;
    }

    fn present_block(&mut self, _frame: &FrameBuffer, rect: BlockRect) {
        self.blocks.push(rect);
    }
}
