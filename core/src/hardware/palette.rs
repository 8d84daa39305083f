pub const PALETTE_ENTRIES: usize = 16;

#[derive(Copy, Clone, Debug, Default, PartialOrd, PartialEq, Eq, Hash)]
pub struct RGB(pub u8, pub u8, pub u8);

impl RGB {
    /// Expands three 4-bit CLUT components to the full 8-bit range.
    #[inline]
    pub fn from_clut_components(red: u8, green: u8, blue: u8) -> Self {
        RGB((red & 0xF) * 17, (green & 0xF) * 17, (blue & 0xF) * 17)
    }

    /// Decodes a single CLUT entry from its two (6-bit) subcode bytes.
    ///
    /// ```text
    ///   byte 0: [ - - R R R R G G ]
    ///   byte 1: [ - - G G B B B B ]
    /// ```
    pub fn from_clut_bytes(high: u8, low: u8) -> Self {
        let red = (high & 0x3C) >> 2;
        let green = ((high & 0x03) << 2) | ((low & 0x30) >> 4);
        let blue = low & 0x0F;
        RGB::from_clut_components(red, green, blue)
    }

    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, 0xFF]
    }
}

impl From<(u8, u8, u8)> for RGB {
    fn from(rgb_tuple: (u8, u8, u8)) -> Self {
        RGB(rgb_tuple.0, rgb_tuple.1, rgb_tuple.2)
    }
}

impl Into<(u8, u8, u8)> for RGB {
    fn into(self) -> (u8, u8, u8) {
        (self.0, self.1, self.2)
    }
}

/// The 16 entry colour lookup table.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Palette {
    pub colours: [RGB; PALETTE_ENTRIES],
}

impl Palette {
    pub fn new() -> Self {
        Palette::default()
    }

    /// Retrieve the colour for the provided palette index.
    ///
    /// Only the lower 4 bits of `index` are considered.
    #[inline]
    pub fn colour(&self, index: u8) -> RGB {
        self.colours[(index & 0xF) as usize]
    }

    /// Sets the entry at `index` to `colour`.
    ///
    /// # Returns
    ///
    /// Whether the stored colour actually changed.
    pub fn set_colour(&mut self, index: usize, colour: RGB) -> bool {
        let entry = &mut self.colours[index & 0xF];
        if *entry == colour {
            return false;
        }
        *entry = colour;
        true
    }

    /// Loads eight consecutive entries starting at `offset` from 16 CLUT data bytes.
    ///
    /// Returns the indices which were changed, in ascending order.
    pub fn load_clut(&mut self, offset: usize, data: &[u8; 16]) -> Vec<usize> {
        data.chunks_exact(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let index = offset + i;
                if self.set_colour(index, RGB::from_clut_bytes(pair[0], pair[1])) {
                    Some(index)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.colours = [RGB::default(); PALETTE_ENTRIES];
    }
}
