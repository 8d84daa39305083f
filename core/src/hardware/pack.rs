//! A CD+G subcode stream is a flat sequence of 24 byte packs. Only the low 6 bits of every
//! byte carry data (the top two bits belong to the P and Q subcode channels).
//!
//! Layout of a pack as far as the TV graphics mode is concerned:
//!
//! | Offset  | Meaning                                            |
//! |---------|----------------------------------------------------|
//! | 0       | Command, `0x09` for TV graphics                    |
//! | 1       | Instruction                                        |
//! | 2..=3   | Parity Q, unused                                   |
//! | 4..=19  | 16 bytes of instruction data                       |
//! | 20..=23 | Parity P, unused                                   |

pub const PACK_SIZE: usize = 24;
/// Packs per second of CD audio: 75 sectors, each with 4 packs.
pub const PACKS_PER_SECOND: usize = 300;

pub const SUBCODE_MASK: u8 = 0x3F;
/// 50x18 (48x16 visible) 16 colour TV graphics mode.
pub const TV_GRAPHICS: u8 = 0x09;

pub const MEMORY_PRESET: u8 = 0x01;
pub const BORDER_PRESET: u8 = 0x02;
pub const COPY_FONT: u8 = 0x06;
pub const SCROLL_PRESET: u8 = 0x14;
pub const SCROLL_COPY: u8 = 0x18;
pub const LOAD_CLUT_LO: u8 = 0x1E;
pub const LOAD_CLUT_HI: u8 = 0x1F;
pub const XOR_FONT: u8 = 0x26;

/// Set on the font instructions when the font should be XOR'd onto VRAM.
pub const XOR_FLAG: u8 = 0x20;
/// Set on the scroll instructions when the scrolled out edge should wrap around.
pub const SCROLL_COPY_FLAG: u8 = 0x08;

/// Offset of the 16 instruction data bytes within a pack.
const DATA_START: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pack([u8; PACK_SIZE]);

impl Pack {
    pub fn new(bytes: [u8; PACK_SIZE]) -> Self {
        Pack(bytes)
    }

    /// Returns the pack at `index` in `stream`, or `None` if the stream doesn't hold
    /// the full 24 bytes.
    pub fn read(stream: &[u8], index: usize) -> Option<Self> {
        let start = index.checked_mul(PACK_SIZE)?;
        let bytes = stream.get(start..start.checked_add(PACK_SIZE)?)?;
        let mut result = [0; PACK_SIZE];
        result.copy_from_slice(bytes);
        Some(Pack(result))
    }

    #[inline]
    pub fn command(&self) -> u8 {
        self.0[0] & SUBCODE_MASK
    }

    #[inline]
    pub fn instruction(&self) -> u8 {
        self.0[1] & SUBCODE_MASK
    }

    /// The 16 instruction specific bytes, *not* masked to 6 bits.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.0[DATA_START..DATA_START + 16]
    }

    #[inline]
    pub fn data_byte(&self, index: usize) -> u8 {
        self.0[DATA_START + index]
    }

    pub fn is_tv_graphics(&self) -> bool {
        self.command() == TV_GRAPHICS
    }

    pub fn as_bytes(&self) -> &[u8; PACK_SIZE] {
        &self.0
    }
}

impl From<[u8; PACK_SIZE]> for Pack {
    fn from(bytes: [u8; PACK_SIZE]) -> Self {
        Pack(bytes)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HorizontalScroll {
    None,
    /// Shift the screen six pixels to the right.
    Right,
    /// Shift the screen six pixels to the left.
    Left,
}

impl HorizontalScroll {
    pub fn decode(value: u8) -> Self {
        match (value & 0x30) >> 4 {
            1 => HorizontalScroll::Right,
            2 => HorizontalScroll::Left,
            _ => HorizontalScroll::None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerticalScroll {
    None,
    /// Shift the screen twelve pixels down.
    Down,
    /// Shift the screen twelve pixels up.
    Up,
}

impl VerticalScroll {
    pub fn decode(value: u8) -> Self {
        match (value & 0x30) >> 4 {
            1 => VerticalScroll::Down,
            2 => VerticalScroll::Up,
            _ => VerticalScroll::None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FontData {
    pub channel: u8,
    pub foreground: u8,
    pub background: u8,
    pub x: u8,
    pub y: u8,
    /// One byte per pixel line, the low 6 bits select foreground (1) or background (0),
    /// bit 5 being the leftmost pixel.
    pub rows: [u8; 12],
    pub xor: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScrollData {
    pub colour: u8,
    pub horizontal: HorizontalScroll,
    pub h_offset: u8,
    pub vertical: VerticalScroll,
    pub v_offset: u8,
    pub copy: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    MemoryPreset { colour: u8 },
    BorderPreset { colour: u8 },
    /// Loads 8 CLUT entries starting at `offset` (0 or 8) from the 16 data bytes.
    LoadClut { offset: usize, data: [u8; 16] },
    Font(FontData),
    Scroll(ScrollData),
}

impl Instruction {
    /// Decodes the graphics instruction contained in `pack`.
    ///
    /// Returns `None` for packs which aren't TV graphics, or carry an instruction we
    /// don't know about.
    pub fn decode(pack: &Pack) -> Option<Self> {
        if !pack.is_tv_graphics() {
            return None;
        }

        let instruction = pack.instruction();
        let result = match instruction {
            MEMORY_PRESET => Instruction::MemoryPreset {
                colour: pack.data_byte(0) & SUBCODE_MASK,
            },
            BORDER_PRESET => Instruction::BorderPreset {
                colour: pack.data_byte(0) & SUBCODE_MASK,
            },
            LOAD_CLUT_LO | LOAD_CLUT_HI => {
                let mut data = [0; 16];
                data.copy_from_slice(pack.data());
                Instruction::LoadClut {
                    offset: if instruction == LOAD_CLUT_HI { 8 } else { 0 },
                    data,
                }
            }
            COPY_FONT | XOR_FONT => Instruction::Font(decode_font(pack, instruction & XOR_FLAG != 0)),
            SCROLL_PRESET | SCROLL_COPY => Instruction::Scroll(ScrollData {
                colour: pack.data_byte(0) & 0x0F,
                horizontal: HorizontalScroll::decode(pack.data_byte(1)),
                h_offset: pack.data_byte(1) & 0x07,
                vertical: VerticalScroll::decode(pack.data_byte(2)),
                v_offset: pack.data_byte(2) & 0x0F,
                copy: instruction & SCROLL_COPY_FLAG != 0,
            }),
            _ => return None,
        };

        Some(result)
    }
}

fn decode_font(pack: &Pack, xor: bool) -> FontData {
    let colour_0 = pack.data_byte(0);
    let colour_1 = pack.data_byte(1);
    // The subcode channel is spread over the upper two data bits of both colour bytes.
    let channel = ((colour_0 & 0x30) >> 2) | ((colour_1 & 0x30) >> 4);
    let mut rows = [0; 12];
    rows.copy_from_slice(&pack.data()[4..16]);

    FontData {
        channel,
        foreground: colour_0 & 0x0F,
        background: colour_1 & 0x0F,
        x: pack.data_byte(3) & SUBCODE_MASK,
        y: pack.data_byte(2) & 0x1F,
        rows,
        xor,
    }
}
