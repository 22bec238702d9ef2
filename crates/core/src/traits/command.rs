//! Command transport interface.
//!
//! Discrete commands leave the action core through [`CommandTransport`].
//! Delivery is fire-and-forget: no acknowledgment is awaited or expected.

use heapless::Vec;

use super::vehicle::{GeoPoint, ModeCode};

/// Capacity of [`RecordingTransport`]
pub const MAX_RECORDED_COMMANDS: usize = 128;

/// Discrete command handed to the host's transport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Request a flight mode change
    SetMode(ModeCode),
    /// Set a servo output to a pulse width (microseconds)
    SetServo { channel: u8, pwm: u16 },
    /// Take a single photo
    TriggerCamera,
    /// Begin video recording
    StartRecording,
    /// End video recording
    StopRecording,
    /// Fly to a position (GUIDED)
    GotoPosition(GeoPoint),
}

/// Outbound command channel.
pub trait CommandTransport {
    /// Queue a command for delivery. Must not block.
    fn send(&mut self, command: Command);
}

/// Transport that records every command, for host tests.
///
/// Commands beyond capacity are dropped and counted.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Vec<Command, MAX_RECORDED_COMMANDS>,
    dropped: u32,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in send order.
    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// Number of commands dropped because the record was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Count of sent commands matching a predicate.
    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.sent.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl CommandTransport for RecordingTransport {
    fn send(&mut self, command: Command) {
        if self.sent.push(command).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_transport_keeps_order() {
        let mut transport = RecordingTransport::new();
        transport.send(Command::StartRecording);
        transport.send(Command::SetMode(ModeCode::LOITER));
        assert_eq!(
            transport.sent(),
            &[Command::StartRecording, Command::SetMode(ModeCode::LOITER)]
        );
    }

    #[test]
    fn recording_transport_counts_drops() {
        let mut transport = RecordingTransport::new();
        for _ in 0..MAX_RECORDED_COMMANDS + 3 {
            transport.send(Command::TriggerCamera);
        }
        assert_eq!(transport.sent().len(), MAX_RECORDED_COMMANDS);
        assert_eq!(transport.dropped(), 3);
    }
}
