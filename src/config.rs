use std::path::PathBuf;

use crate::channel_config::ChannelFamily;

/// Settings of a [`Lecroy`](crate::Lecroy) facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LecroyConfig {
    /// Analog inputs fitted; setup and readback sweep `C1..=C<analog_channels>`.
    pub analog_channels: u8,
    /// Measurement slot borrowed by `update_signal_offset`.
    pub scratch_slot: u8,
    /// Where screen captures without an explicit path are written.
    pub capture_dir: PathBuf,
}

impl LecroyConfig {
    pub const DEFAULT_SCRATCH_SLOT: u8 = 12;

    pub fn with_analog_channels(mut self, analog_channels: u8) -> Self {
        self.analog_channels = analog_channels.clamp(1, ChannelFamily::MAX_ANALOG);
        self
    }

    pub fn with_scratch_slot(mut self, slot: u8) -> Self {
        let slots = ChannelFamily::Measurement.range();
        self.scratch_slot = slot.clamp(*slots.start(), *slots.end());
        self
    }

    pub fn with_capture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.capture_dir = dir.into();
        self
    }
}

impl Default for LecroyConfig {
    fn default() -> Self {
        Self {
            analog_channels: ChannelFamily::MAX_ANALOG,
            scratch_slot: Self::DEFAULT_SCRATCH_SLOT,
            capture_dir: PathBuf::from("."),
        }
    }
}
