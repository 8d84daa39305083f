use crate::hardware::palette::Palette;
use crate::hardware::vram::{Vram, FONT_HEIGHT, FONT_WIDTH};

/// Width of the visible screen, in pixels.
pub const RESOLUTION_WIDTH: usize = 288;
/// Height of the visible screen, in pixels.
pub const RESOLUTION_HEIGHT: usize = 192;
pub const RGBA_CHANNELS: usize = 4;
pub const FRAMEBUFFER_SIZE: usize = RESOLUTION_WIDTH * RESOLUTION_HEIGHT;
/// Row stride of the [FrameBuffer], in bytes.
pub const FRAMEBUFFER_STRIDE: usize = RESOLUTION_WIDTH * RGBA_CHANNELS;

/// Number of font columns visible on screen, VRAM has one extra on either side.
const VISIBLE_X_FONTS: usize = RESOLUTION_WIDTH / FONT_WIDTH;
/// Number of font rows visible on screen, VRAM has one extra above and below.
const VISIBLE_Y_FONTS: usize = RESOLUTION_HEIGHT / FONT_HEIGHT;

/// An RGBA8888, row-major pixel buffer of the visible 288x192 screen.
#[derive(Clone, PartialEq)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: vec![0; FRAMEBUFFER_SIZE * RGBA_CHANNELS],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA value of the pixel at (`x`, `y`), with the top left being (0, 0).
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = y * FRAMEBUFFER_STRIDE + x * RGBA_CHANNELS;
        let mut result = [0; 4];
        result.copy_from_slice(&self.pixels[offset..offset + RGBA_CHANNELS]);
        result
    }

    /// Copies the pixels inside `rect` into a tightly packed RGBA buffer.
    pub fn copy_rect(&self, rect: BlockRect) -> Vec<u8> {
        let row_bytes = rect.width * RGBA_CHANNELS;
        let mut result = Vec::with_capacity(row_bytes * rect.height);
        for y in rect.y..rect.y + rect.height {
            let offset = y * FRAMEBUFFER_STRIDE + rect.x * RGBA_CHANNELS;
            result.extend_from_slice(&self.pixels[offset..offset + row_bytes]);
        }
        result
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &RESOLUTION_WIDTH)
            .field("height", &RESOLUTION_HEIGHT)
            .finish()
    }
}

/// A rectangle on the visible screen, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BlockRect {
    /// The on-screen rectangle of the VRAM font block at (`block_x`, `block_y`).
    ///
    /// `None` for the offscreen border blocks, only `1..=48` by `1..=16` are visible.
    pub fn for_block(block_x: usize, block_y: usize) -> Option<Self> {
        if !(1..=VISIBLE_X_FONTS).contains(&block_x) || !(1..=VISIBLE_Y_FONTS).contains(&block_y) {
            return None;
        }

        Some(BlockRect {
            x: (block_x - 1) * FONT_WIDTH,
            y: (block_y - 1) * FONT_HEIGHT,
            width: FONT_WIDTH,
            height: FONT_HEIGHT,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderUpdate {
    /// Nothing was dirty, the buffer wasn't touched.
    Unchanged,
    /// The entire buffer was redrawn.
    Full,
    /// Only these rectangles were redrawn.
    Blocks(Vec<BlockRect>),
}

/// The presentation layer a rendered [FrameBuffer] is handed to.
pub trait DisplaySink {
    /// Whether `present_block` may be used, if not every update is a `present_full`.
    fn supports_partial_updates(&self) -> bool {
        false
    }

    fn present_full(&mut self, frame: &FrameBuffer);

    /// Only the pixels within `rect` changed since the previous present.
    fn present_block(&mut self, frame: &FrameBuffer, rect: BlockRect) {
        let _ = rect;
        self.present_full(frame);
    }
}

/// Draws the entire visible screen, skipping the offscreen font column on either side
/// as well as the offscreen font row at the top and bottom.
pub fn render_screen(vram: &Vram, palette: &Palette, frame: &mut FrameBuffer) {
    let colours = palette_rgba(palette);

    for (y, frame_line) in frame.pixels.chunks_exact_mut(FRAMEBUFFER_STRIDE).enumerate() {
        let vram_line = &vram.line(y + FONT_HEIGHT)[1..=VISIBLE_X_FONTS];

        for (packed, out) in vram_line.iter().zip(frame_line.chunks_exact_mut(FONT_WIDTH * RGBA_CHANNELS)) {
            write_packed_row(packed.pixels(), &colours, out);
        }
    }
}

/// Draws the 6x12 pixels of the VRAM font block at (`block_x`, `block_y`) into its
/// position in `frame`.
///
/// Offscreen blocks are ignored.
pub fn render_block(vram: &Vram, palette: &Palette, block_x: usize, block_y: usize, frame: &mut FrameBuffer) {
    let rect = match BlockRect::for_block(block_x, block_y) {
        Some(rect) => rect,
        None => return,
    };
    let colours = palette_rgba(palette);
    let first_line = block_y * FONT_HEIGHT;

    for line in 0..FONT_HEIGHT {
        let offset = (rect.y + line) * FRAMEBUFFER_STRIDE + rect.x * RGBA_CHANNELS;
        let out = &mut frame.pixels[offset..offset + FONT_WIDTH * RGBA_CHANNELS];
        write_packed_row(vram.row(block_x, first_line + line).pixels(), &colours, out);
    }
}

#[inline]
fn palette_rgba(palette: &Palette) -> [[u8; 4]; 16] {
    let mut result = [[0; 4]; 16];
    for (rgba, colour) in result.iter_mut().zip(palette.colours.iter()) {
        *rgba = colour.to_rgba();
    }
    result
}

#[inline(always)]
fn write_packed_row(pixels: [u8; FONT_WIDTH], colours: &[[u8; 4]; 16], out: &mut [u8]) {
    for (index, pixel) in pixels.iter().zip(out.chunks_exact_mut(RGBA_CHANNELS)) {
        pixel.copy_from_slice(&colours[*index as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::palette::RGB;
    use crate::hardware::vram::PackedRow;

    #[test]
    fn test_render_screen_skips_offscreen() {
        let mut vram = Vram::new();
        let mut palette = Palette::new();
        palette.set_colour(1, RGB(10, 20, 30));
        // Offscreen column 0 and line 11 should never show up.
        vram.set_row(0, 12, PackedRow::filled(1));
        vram.set_row(1, 11, PackedRow::filled(1));
        vram.set_row(1, 12, PackedRow::from_font_line(0b10_0000, 1, 0));

        let mut frame = FrameBuffer::new();
        render_screen(&vram, &palette, &mut frame);

        assert_eq!(frame.pixel(0, 0), [10, 20, 30, 0xFF]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 0, 0xFF]);
        assert_eq!(frame.pixel(0, 1), [0, 0, 0, 0xFF]);
        assert_eq!(frame.pixel(287, 191), [0, 0, 0, 0xFF]);
    }

    #[test]
    fn test_block_rect() {
        assert_eq!(
            BlockRect::for_block(48, 16),
            Some(BlockRect {
                x: 282,
                y: 180,
                width: 6,
                height: 12
            })
        );
        assert_eq!(BlockRect::for_block(1, 1).map(|r| (r.x, r.y)), Some((0, 0)));
    }

    #[test]
    fn test_block_rect_offscreen() {
        assert_eq!(BlockRect::for_block(0, 1), None);
        assert_eq!(BlockRect::for_block(49, 1), None);
        assert_eq!(BlockRect::for_block(1, 0), None);
        assert_eq!(BlockRect::for_block(1, 17), None);
    }

    #[test]
    fn test_render_block_ignores_offscreen() {
        let mut vram = Vram::new();
        vram.fill(1);
        let mut palette = Palette::new();
        palette.set_colour(1, RGB(1, 1, 1));
        let mut frame = FrameBuffer::new();

        render_block(&vram, &palette, 0, 5, &mut frame);
        render_block(&vram, &palette, 49, 5, &mut frame);
        render_block(&vram, &palette, 5, 17, &mut frame);

        assert!(frame.as_bytes().iter().all(|&b| b == 0));
    }
}
