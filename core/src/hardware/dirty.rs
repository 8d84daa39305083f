use bitflags::*;
use itertools::iproduct;

use crate::hardware::vram::{NUM_X_FONTS, NUM_Y_FONTS};

pub const NUM_BLOCKS: usize = NUM_X_FONTS * NUM_Y_FONTS;
/// Visible font blocks, the outer ring of VRAM is never displayed.
pub const VISIBLE_X_BLOCKS: std::ops::RangeInclusive<usize> = 1..=48;
pub const VISIBLE_Y_BLOCKS: std::ops::RangeInclusive<usize> = 1..=16;

bitflags! {
    /// Changes which invalidate the entire frame.
    #[derive(Default)]
    pub struct GlobalDirty: u8 {
        /// The colour of the border changed.
        const BORDER = 0b0000_0001;
        /// All of VRAM or the palette changed.
        const SCREEN = 0b0000_0010;
    }
}

#[derive(Debug, Clone)]
pub struct DirtyTracker {
    blocks: [bool; NUM_BLOCKS],
    global: GlobalDirty,
}

impl DirtyTracker {
    pub fn new() -> Self {
        DirtyTracker {
            blocks: [false; NUM_BLOCKS],
            global: GlobalDirty::empty(),
        }
    }

    /// Marks the font block at (`x`, `y`) as changed. Out of range blocks are ignored.
    pub fn mark_block(&mut self, x: usize, y: usize) {
        if x < NUM_X_FONTS && y < NUM_Y_FONTS {
            self.blocks[y * NUM_X_FONTS + x] = true;
        }
    }

    pub fn is_block_dirty(&self, x: usize, y: usize) -> bool {
        x < NUM_X_FONTS && y < NUM_Y_FONTS && self.blocks[y * NUM_X_FONTS + x]
    }

    pub fn mark_screen(&mut self) {
        self.global.insert(GlobalDirty::SCREEN);
    }

    pub fn mark_border(&mut self) {
        self.global.insert(GlobalDirty::BORDER);
    }

    pub fn screen_dirty(&self) -> bool {
        self.global.contains(GlobalDirty::SCREEN)
    }

    pub fn border_dirty(&self) -> bool {
        self.global.contains(GlobalDirty::BORDER)
    }

    /// Whether the next render has to redraw the whole frame.
    pub fn needs_full_redraw(&self) -> bool {
        !self.global.is_empty()
    }

    pub fn any_block_dirty(&self) -> bool {
        self.blocks.iter().any(|&b| b)
    }

    pub fn is_clean(&self) -> bool {
        !self.needs_full_redraw() && !self.any_block_dirty()
    }

    /// Returns all dirty *visible* blocks in row-major order and clears their flags.
    ///
    /// Flags of the offscreen ring are left alone.
    pub fn take_visible_blocks(&mut self) -> Vec<(usize, usize)> {
        let blocks = &mut self.blocks;
        iproduct!(VISIBLE_Y_BLOCKS, VISIBLE_X_BLOCKS)
            .filter_map(|(y, x)| {
                let flag = &mut blocks[y * NUM_X_FONTS + x];
                if *flag {
                    *flag = false;
                    Some((x, y))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.blocks = [false; NUM_BLOCKS];
        self.global = GlobalDirty::empty();
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        DirtyTracker::new()
    }
}
