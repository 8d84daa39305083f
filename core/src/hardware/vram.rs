//! VRAM is stored as packed font rows rather than individual pixels.
//!
//! Every [PackedRow] holds the six 4-bit palette indices of one 6 pixel wide font line,
//! pixel 0 (leftmost) in bits 0-3 up to pixel 5 in bits 20-23. A full VRAM line
//! is therefore `NUM_X_FONTS` packed rows wide.

/// Width of VRAM, in pixels.
pub const VRAM_WIDTH: usize = 300;
/// Height of VRAM, in pixels.
pub const VRAM_HEIGHT: usize = 216;
pub const FONT_WIDTH: usize = 6;
pub const FONT_HEIGHT: usize = 12;
/// Number of horizontal fonts contained in VRAM.
pub const NUM_X_FONTS: usize = VRAM_WIDTH / FONT_WIDTH;
/// Number of vertical fonts contained in VRAM.
pub const NUM_Y_FONTS: usize = VRAM_HEIGHT / FONT_HEIGHT;
pub const VRAM_SIZE: usize = NUM_X_FONTS * VRAM_HEIGHT;

const PACKED_MASK: u32 = 0x00FF_FFFF;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PackedRow(u32);

impl PackedRow {
    /// Fills all six pixels with `index`.
    pub fn filled(index: u8) -> Self {
        let index = (index & 0xF) as u32;
        PackedRow(index * 0x0011_1111)
    }

    /// Packs a font line, where bit 5 of `bits` selects the colour of the leftmost pixel.
    pub fn from_font_line(bits: u8, foreground: u8, background: u8) -> Self {
        let (foreground, background) = ((foreground & 0xF) as u32, (background & 0xF) as u32);
        let mut result = 0;
        for pixel in 0..FONT_WIDTH {
            let colour = if bits & (0x20 >> pixel) != 0 { foreground } else { background };
            result |= colour << (pixel * 4);
        }
        PackedRow(result)
    }

    pub fn from_bits(bits: u32) -> Self {
        PackedRow(bits & PACKED_MASK)
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns the palette index of `pixel` (0 is leftmost).
    #[inline]
    pub fn pixel(self, pixel: usize) -> u8 {
        ((self.0 >> (pixel * 4)) & 0xF) as u8
    }

    /// All six palette indices, from left to right.
    #[inline]
    pub fn pixels(self) -> [u8; FONT_WIDTH] {
        [
            self.pixel(0),
            self.pixel(1),
            self.pixel(2),
            self.pixel(3),
            self.pixel(4),
            self.pixel(5),
        ]
    }

    #[inline]
    pub fn xor(self, other: PackedRow) -> Self {
        PackedRow(self.0 ^ other.0)
    }
}

pub struct Vram {
    data: Vec<PackedRow>,
}

impl Vram {
    pub fn new() -> Self {
        Vram {
            data: vec![PackedRow::default(); VRAM_SIZE],
        }
    }

    #[inline]
    fn address(font_x: usize, line: usize) -> usize {
        line * NUM_X_FONTS + font_x
    }

    #[inline]
    pub fn row(&self, font_x: usize, line: usize) -> PackedRow {
        self.data[Self::address(font_x, line)]
    }

    #[inline]
    pub fn set_row(&mut self, font_x: usize, line: usize, value: PackedRow) {
        self.data[Self::address(font_x, line)] = value;
    }

    #[inline]
    pub fn xor_row(&mut self, font_x: usize, line: usize, value: PackedRow) {
        let address = Self::address(font_x, line);
        self.data[address] = self.data[address].xor(value);
    }

    /// A single VRAM line of `NUM_X_FONTS` packed rows.
    pub fn line(&self, line: usize) -> &[PackedRow] {
        let start = Self::address(0, line);
        &self.data[start..start + NUM_X_FONTS]
    }

    pub fn line_mut(&mut self, line: usize) -> &mut [PackedRow] {
        let start = Self::address(0, line);
        &mut self.data[start..start + NUM_X_FONTS]
    }

    /// Sets every pixel in VRAM to the palette `index`.
    pub fn fill(&mut self, index: u8) {
        let packed = PackedRow::filled(index);
        self.data.iter_mut().for_each(|row| *row = packed);
    }

    pub fn rows(&self) -> &[PackedRow] {
        &self.data
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [PackedRow] {
        &mut self.data
    }
}

impl Default for Vram {
    fn default() -> Self {
        Vram::new()
    }
}
