pub mod decoder;
pub mod hardware;

#[cfg(test)]
mod tests;

pub use crate::decoder::{packs_for_seconds, CdgDecoder, DecodeError};

/// Subcode channels 0 and 1 carry the main graphics.
pub const DEFAULT_CHANNEL_MASK: u16 = 0b0000_0000_0000_0011;

/// Struct for wrapping all the various options for the `CdgDecoder`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Bit `n` set means font writes on subcode channel `n` are applied.
    pub channel_mask: u16,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptionsBuilder::new().build()
    }
}

#[derive(Debug)]
pub struct DecoderOptionsBuilder {
    channel_mask: u16,
}

impl DecoderOptionsBuilder {
    pub fn new() -> Self {
        DecoderOptionsBuilder {
            channel_mask: DEFAULT_CHANNEL_MASK,
        }
    }

    pub fn with_channel_mask(mut self, channel_mask: u16) -> Self {
        self.channel_mask = channel_mask;
        self
    }

    pub fn build(self) -> DecoderOptions {
        DecoderOptions {
            channel_mask: self.channel_mask,
        }
    }
}

impl From<DecoderOptions> for DecoderOptionsBuilder {
    fn from(from: DecoderOptions) -> Self {
        DecoderOptionsBuilder {
            channel_mask: from.channel_mask,
        }
    }
}
