//! Block granularity scrolling of VRAM.
//!
//! A horizontal scroll moves every VRAM line one packed row (6 pixels), a vertical scroll
//! moves the whole of VRAM by one font height (12 lines). `SCROLL_COPY` wraps the edge that
//! scrolls out back in on the opposite side, `SCROLL_PRESET` fills it with a colour instead.

use crate::hardware::pack::{HorizontalScroll, ScrollData, VerticalScroll};
use crate::hardware::vram::{PackedRow, Vram, FONT_HEIGHT, NUM_X_FONTS, VRAM_HEIGHT};

/// What to put in the vacated column/row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScrollFill {
    Wrap,
    Preset(u8),
}

impl From<&ScrollData> for ScrollFill {
    fn from(scroll: &ScrollData) -> Self {
        if scroll.copy {
            ScrollFill::Wrap
        } else {
            ScrollFill::Preset(scroll.colour)
        }
    }
}

/// Applies both axes of `scroll` to `vram`, horizontal first.
///
/// # Returns
///
/// Whether any VRAM contents were moved.
pub fn apply_scroll(vram: &mut Vram, scroll: &ScrollData) -> bool {
    let fill = ScrollFill::from(scroll);
    let horizontal = scroll_horizontal(vram, scroll.horizontal, fill);
    let vertical = scroll_vertical(vram, scroll.vertical, fill);
    horizontal || vertical
}

pub fn scroll_horizontal(vram: &mut Vram, direction: HorizontalScroll, fill: ScrollFill) -> bool {
    let shift_right = match direction {
        HorizontalScroll::None => return false,
        HorizontalScroll::Right => true,
        HorizontalScroll::Left => false,
    };

    for line in 0..VRAM_HEIGHT {
        let line = vram.line_mut(line);
        if shift_right {
            line.rotate_right(1);
            if let ScrollFill::Preset(colour) = fill {
                line[0] = PackedRow::filled(colour);
            }
        } else {
            line.rotate_left(1);
            if let ScrollFill::Preset(colour) = fill {
                line[NUM_X_FONTS - 1] = PackedRow::filled(colour);
            }
        }
    }

    true
}

pub fn scroll_vertical(vram: &mut Vram, direction: VerticalScroll, fill: ScrollFill) -> bool {
    // One font block worth of packed rows.
    const SHIFT: usize = FONT_HEIGHT * NUM_X_FONTS;

    let rows = vram.rows_mut();
    let vacated = match direction {
        VerticalScroll::None => return false,
        VerticalScroll::Down => {
            rows.rotate_right(SHIFT);
            0..SHIFT
        }
        VerticalScroll::Up => {
            rows.rotate_left(SHIFT);
            rows.len() - SHIFT..rows.len()
        }
    };

    if let ScrollFill::Preset(colour) = fill {
        let packed = PackedRow::filled(colour);
        rows[vacated].iter_mut().for_each(|row| *row = packed);
    }

    true
}
