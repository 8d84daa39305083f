//! Instruction handlers, kept out of `decoder.rs` so the public API stays readable.
//!
//! Disc data is subject to read errors, so every handler silently drops instructions with
//! out of range operands instead of failing.

use log::*;

use crate::decoder::CdgDecoder;
use crate::hardware::pack::{FontData, Instruction, Pack, ScrollData};
use crate::hardware::scroll::apply_scroll;
use crate::hardware::vram::{PackedRow, FONT_HEIGHT, NUM_X_FONTS, NUM_Y_FONTS};

impl CdgDecoder {
    /// Decode and apply a single pack. Non graphics packs and unknown instructions are no-ops.
    pub fn execute_pack(&mut self, pack: &Pack) {
        let instruction = match Instruction::decode(pack) {
            Some(instruction) => instruction,
            None => return,
        };

        #[cfg(feature = "pack-logging")]
        trace!("Executing {:?}", instruction);

        match instruction {
            Instruction::MemoryPreset { colour } => self.memory_preset(colour),
            Instruction::BorderPreset { colour } => self.border_preset(colour),
            Instruction::LoadClut { offset, data } => self.load_clut(offset, &data),
            Instruction::Font(font) => self.write_font(&font),
            Instruction::Scroll(scroll) => self.scroll(&scroll),
        }
    }

    fn memory_preset(&mut self, colour: u8) {
        self.vram.fill(colour);
        self.dirty.mark_screen();
    }

    /// The border only needs a redraw if its *colour* changes, two indices may well share an RGB value.
    fn border_preset(&mut self, colour: u8) {
        let new_index = colour & 0xF;
        if self.palette.colour(new_index) != self.palette.colour(self.border_index) {
            self.dirty.mark_border();
        }
        self.border_index = new_index;
    }

    fn load_clut(&mut self, offset: usize, data: &[u8; 16]) {
        let changed = self.palette.load_clut(offset, data);
        if changed.is_empty() {
            return;
        }

        self.dirty.mark_screen();
        if changed.contains(&(self.border_index as usize)) {
            self.dirty.mark_border();
        }
    }

    fn write_font(&mut self, font: &FontData) {
        if (self.options.channel_mask >> font.channel) & 0x1 == 0 {
            trace!("Ignoring font for inactive channel {}", font.channel);
            return;
        }

        let (x, y) = (font.x as usize, font.y as usize);
        if x >= NUM_X_FONTS || y >= NUM_Y_FONTS {
            trace!("Dropping font write to invalid block ({}, {})", x, y);
            return;
        }

        let first_line = y * FONT_HEIGHT;
        for (line, bits) in font.rows.iter().enumerate() {
            let packed = PackedRow::from_font_line(*bits, font.foreground, font.background);
            if font.xor {
                self.vram.xor_row(x, first_line + line, packed);
            } else {
                self.vram.set_row(x, first_line + line, packed);
            }
        }

        self.dirty.mark_block(x, y);
    }

    fn scroll(&mut self, scroll: &ScrollData) {
        self.scroll_offset = (scroll.h_offset, scroll.v_offset);

        if apply_scroll(&mut self.vram, scroll) {
            debug!(
                "Scrolled VRAM h: {:?} v: {:?} copy: {}",
                scroll.horizontal, scroll.vertical, scroll.copy
            );
        }

        self.dirty.mark_screen();
    }
}
