//! Output channels shared by all routines
//!
//! Light levels and gimbal angles go to a single process-wide sink. The
//! policy is last writer wins; the action registry cancels conflicting
//! routines before starting a new one so two patterns never drive the same
//! channel at once.

use bitflags::bitflags;
use heapless::Vec;

/// Capacity of the [`MockOutputs`] write history
pub const MAX_OUTPUT_HISTORY: usize = 256;

/// A single output channel.
///
/// Light channels take a level in percent (0-100); gimbal channels take an
/// angle in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Pan = 3,
    Tilt = 4,
}

impl OutputChannel {
    pub const ALL: [OutputChannel; 5] = [
        OutputChannel::Red,
        OutputChannel::Green,
        OutputChannel::Blue,
        OutputChannel::Pan,
        OutputChannel::Tilt,
    ];

    /// The [`Channels`] bit for this channel.
    pub const fn bit(self) -> Channels {
        Channels::from_bits_truncate(1 << self as u8)
    }
}

bitflags! {
    /// Set of output channels a routine writes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Channels: u8 {
        const RED = 0b0000_0001;
        const GREEN = 0b0000_0010;
        const BLUE = 0b0000_0100;
        const PAN = 0b0000_1000;
        const TILT = 0b0001_0000;

        const LIGHT = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        const GIMBAL = Self::PAN.bits() | Self::TILT.bits();
    }
}

/// Process-wide output sink.
pub trait OutputSink {
    /// Write a value to a channel. Must not block.
    fn write(&mut self, channel: OutputChannel, value: f32);
}

/// Write zero to every channel in `channels`.
pub fn reset_channels(sink: &mut dyn OutputSink, channels: Channels) {
    for channel in OutputChannel::ALL {
        if channels.contains(channel.bit()) {
            sink.write(channel, 0.0);
        }
    }
}

/// Output sink that remembers the last value per channel and every write.
#[derive(Debug, Default)]
pub struct MockOutputs {
    values: [f32; 5],
    history: Vec<(OutputChannel, f32), MAX_OUTPUT_HISTORY>,
}

impl MockOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written to a channel (0.0 if never written).
    pub fn value(&self, channel: OutputChannel) -> f32 {
        self.values[channel as usize]
    }

    /// Every write, oldest first. Writes past capacity are not recorded.
    pub fn history(&self) -> &[(OutputChannel, f32)] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl OutputSink for MockOutputs {
    fn write(&mut self, channel: OutputChannel, value: f32) {
        self.values[channel as usize] = value;
        let _ = self.history.push((channel, value));
    }
}
