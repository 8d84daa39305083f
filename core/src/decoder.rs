use log::*;
use thiserror::Error;

use crate::hardware::dirty::DirtyTracker;
use crate::hardware::pack::{Pack, PACKS_PER_SECOND, PACK_SIZE};
use crate::hardware::palette::{Palette, RGB};
use crate::hardware::renderer::{render_block, render_screen, BlockRect, DisplaySink, FrameBuffer, RenderUpdate};
use crate::hardware::vram::Vram;
use crate::DecoderOptions;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("decoding up to pack {target_pack} requires {required} bytes, but only {available} were supplied")]
    InsufficientInput {
        target_pack: usize,
        required: usize,
        available: usize,
    },
}

/// Converts a playback position to the pack index which should be decoded up to.
pub fn packs_for_seconds(seconds: f64) -> usize {
    if seconds.is_nan() || seconds <= 0.0 {
        0
    } else {
        (seconds * PACKS_PER_SECOND as f64) as usize
    }
}

/// The complete CD+G graphics state.
///
/// All state is owned by the decoder, which is strictly single-writer: a `decode_to` call
/// and a render must never overlap, which the `&mut self` receivers enforce.
pub struct CdgDecoder {
    pub(crate) palette: Palette,
    pub(crate) vram: Vram,
    pub(crate) dirty: DirtyTracker,
    pub(crate) border_index: u8,
    /// Fine (horizontal, vertical) scroll offset of the most recent scroll instruction.
    pub(crate) scroll_offset: (u8, u8),
    pub(crate) options: DecoderOptions,
    /// All packs strictly before this index have been applied.
    current_pack: usize,
}

impl CdgDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        CdgDecoder {
            palette: Palette::new(),
            vram: Vram::new(),
            dirty: DirtyTracker::new(),
            border_index: 0,
            scroll_offset: (0, 0),
            options,
            current_pack: 0,
        }
    }

    /// Zeroes all graphics state and rewinds to the very first pack.
    ///
    /// Leaves no dirty flags behind.
    pub fn reset(&mut self) {
        self.current_pack = 0;
        self.border_index = 0;
        self.scroll_offset = (0, 0);
        self.palette.clear();
        self.vram.fill(0);
        self.dirty.clear();
    }

    /// Applies every pack in `[current_pack, target_pack)` from `stream`.
    ///
    /// If `target_pack` lies behind the packs which have already been applied the decoder
    /// is reset and the stream is replayed from the start. Malformed packs are skipped.
    ///
    /// # Errors
    ///
    /// If `stream` doesn't contain `target_pack` complete packs, in which case no state is
    /// modified.
    pub fn decode_to(&mut self, stream: &[u8], target_pack: usize) -> Result<(), DecodeError> {
        let required = target_pack.saturating_mul(PACK_SIZE);
        if stream.len() < required {
            return Err(DecodeError::InsufficientInput {
                target_pack,
                required,
                available: stream.len(),
            });
        }

        if target_pack < self.current_pack {
            debug!(
                "Seeking backwards from pack {} to {}, replaying from the start",
                self.current_pack, target_pack
            );
            self.reset();
            // The framebuffer still shows the later state.
            self.dirty.mark_screen();
        }

        for index in self.current_pack..target_pack {
            if let Some(pack) = Pack::read(stream, index) {
                self.execute_pack(&pack);
            }
        }

        self.current_pack = target_pack;
        Ok(())
    }

    /// Brings `frame` up to date with the current graphics state.
    ///
    /// A full redraw happens if the border or the entire screen changed, otherwise only
    /// the dirty visible font blocks are drawn. All flags which were acted upon are cleared.
    pub fn render_frame(&mut self, frame: &mut FrameBuffer) -> RenderUpdate {
        if self.dirty.needs_full_redraw() {
            self.render_full(frame);
            return RenderUpdate::Full;
        }

        let blocks = self.render_dirty_blocks(frame, |_, _| {});
        if blocks.is_empty() {
            RenderUpdate::Unchanged
        } else {
            RenderUpdate::Blocks(blocks)
        }
    }

    /// Renders like [render_frame](Self::render_frame) and hands the result to `sink`.
    ///
    /// Sinks with partial update support get every dirty block flushed as soon as it's drawn,
    /// others get a single full flush once all dirty blocks are drawn.
    pub fn present<S: DisplaySink>(&mut self, frame: &mut FrameBuffer, sink: &mut S) -> RenderUpdate {
        if self.dirty.needs_full_redraw() {
            self.render_full(frame);
            sink.present_full(frame);
            return RenderUpdate::Full;
        }

        if sink.supports_partial_updates() {
            let blocks = self.render_dirty_blocks(frame, |frame, rect| sink.present_block(frame, rect));
            if blocks.is_empty() {
                RenderUpdate::Unchanged
            } else {
                RenderUpdate::Blocks(blocks)
            }
        } else {
            let blocks = self.render_dirty_blocks(frame, |_, _| {});
            if blocks.is_empty() {
                RenderUpdate::Unchanged
            } else {
                sink.present_full(frame);
                RenderUpdate::Blocks(blocks)
            }
        }
    }

    fn render_full(&mut self, frame: &mut FrameBuffer) {
        render_screen(&self.vram, &self.palette, frame);
        self.dirty.clear();
    }

    fn render_dirty_blocks(
        &mut self,
        frame: &mut FrameBuffer,
        mut on_block: impl FnMut(&FrameBuffer, BlockRect),
    ) -> Vec<BlockRect> {
        self.dirty
            .take_visible_blocks()
            .into_iter()
            .filter_map(|(x, y)| {
                let rect = BlockRect::for_block(x, y)?;
                render_block(&self.vram, &self.palette, x, y, frame);
                on_block(frame, rect);
                Some(rect)
            })
            .collect()
    }

    /// Index of the next pack to be decoded.
    pub fn current_pack(&self) -> usize {
        self.current_pack
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    pub fn border_index(&self) -> u8 {
        self.border_index
    }

    pub fn border_colour(&self) -> RGB {
        self.palette.colour(self.border_index)
    }

    /// The fine (horizontal, vertical) pixel offset requested by the most recent scroll.
    ///
    /// Only block-sized scrolls are rendered, this is purely informational.
    pub fn scroll_offset(&self) -> (u8, u8) {
        self.scroll_offset
    }
}

impl Default for CdgDecoder {
    fn default() -> Self {
        CdgDecoder::new(DecoderOptions::default())
    }
}
