//! Actuator mapping for light and gimbal outputs
//!
//! Converts routine outputs (light percent, gimbal degrees) into servo PWM
//! commands:
//! - Input values are clamped to the configured range, never rejected
//! - Linear mapping via [`map_value`]
//! - One servo output channel per [`OutputChannel`]
//!
//! # Design
//!
//! This module is pure `no_std` with no feature gates. The PWM signal itself
//! is generated by the host, which receives `Command::SetServo`.

use crate::output::{OutputChannel, OutputSink};
use crate::traits::{Command, CommandTransport};

/// Linearly map `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// The input is clamped to the input range first. A degenerate input range
/// maps everything to `out_min`.
///
/// ```
/// use trail_actions_core::servo::map_value;
/// assert_eq!(map_value(50.0, 0.0, 100.0, 1000.0, 2000.0), 1500.0);
/// ```
pub fn map_value(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    let (lo, hi) = if in_min <= in_max {
        (in_min, in_max)
    } else {
        (in_max, in_min)
    };
    let clamped = value.clamp(lo, hi);
    out_min + (clamped - in_min) * (out_max - out_min) / span
}

/// Servo output numbers for each channel (1-based, as on the autopilot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoMap {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub pan: u8,
    pub tilt: u8,
}

impl Default for ServoMap {
    fn default() -> Self {
        Self {
            red: 9,
            green: 10,
            blue: 11,
            pan: 12,
            tilt: 13,
        }
    }
}

impl ServoMap {
    pub fn servo_for(&self, channel: OutputChannel) -> u8 {
        match channel {
            OutputChannel::Red => self.red,
            OutputChannel::Green => self.green,
            OutputChannel::Blue => self.blue,
            OutputChannel::Pan => self.pan,
            OutputChannel::Tilt => self.tilt,
        }
    }
}

/// PWM and angle ranges used for the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoConfig {
    /// Pulse width at the low end of every range (us)
    pub pwm_min: u16,
    /// Pulse width at the high end of every range (us)
    pub pwm_max: u16,
    /// Gimbal pan range (degrees)
    pub pan_min: f32,
    pub pan_max: f32,
    /// Gimbal tilt range (degrees, negative = down)
    pub tilt_min: f32,
    pub tilt_max: f32,
    pub map: ServoMap,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            pwm_min: 1000,
            pwm_max: 2000,
            pan_min: -180.0,
            pan_max: 180.0,
            tilt_min: -90.0,
            tilt_max: 30.0,
            map: ServoMap::default(),
        }
    }
}

impl ServoConfig {
    /// Input range for a channel.
    pub fn input_range(&self, channel: OutputChannel) -> (f32, f32) {
        match channel {
            OutputChannel::Red | OutputChannel::Green | OutputChannel::Blue => (0.0, 100.0),
            OutputChannel::Pan => (self.pan_min, self.pan_max),
            OutputChannel::Tilt => (self.tilt_min, self.tilt_max),
        }
    }

    /// Pulse width for a channel value, clamped to the channel's range.
    pub fn pulse_for(&self, channel: OutputChannel, value: f32) -> u16 {
        let (in_min, in_max) = self.input_range(channel);
        let pwm = map_value(
            value,
            in_min,
            in_max,
            self.pwm_min as f32,
            self.pwm_max as f32,
        );
        libm::roundf(pwm) as u16
    }
}

/// [`OutputSink`] that turns channel writes into servo commands.
pub struct ServoOutput<'a> {
    config: ServoConfig,
    transport: &'a mut dyn CommandTransport,
}

impl<'a> ServoOutput<'a> {
    pub fn new(config: ServoConfig, transport: &'a mut dyn CommandTransport) -> Self {
        Self { config, transport }
    }
}

impl OutputSink for ServoOutput<'_> {
    fn write(&mut self, channel: OutputChannel, value: f32) {
        let pwm = self.config.pulse_for(channel, value);
        self.transport.send(Command::SetServo {
            channel: self.config.map.servo_for(channel),
            pwm,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RecordingTransport;

    #[test]
    fn map_value_midpoint() {
        assert_eq!(map_value(50.0, 0.0, 100.0, 1000.0, 2000.0), 1500.0);
    }

    #[test]
    fn map_value_clamps_input() {
        assert_eq!(map_value(150.0, 0.0, 100.0, 1000.0, 2000.0), 2000.0);
        assert_eq!(map_value(-20.0, 0.0, 100.0, 1000.0, 2000.0), 1000.0);
    }

    #[test]
    fn map_value_inverted_output() {
        assert_eq!(map_value(25.0, 0.0, 100.0, 2000.0, 1000.0), 1750.0);
    }

    #[test]
    fn map_value_degenerate_range() {
        assert_eq!(map_value(7.0, 3.0, 3.0, 1100.0, 1900.0), 1100.0);
    }

    #[test]
    fn pulse_for_gimbal_angles() {
        let config = ServoConfig::default();
        assert_eq!(config.pulse_for(OutputChannel::Pan, 0.0), 1500);
        assert_eq!(config.pulse_for(OutputChannel::Pan, -270.0), 1000);
        assert_eq!(config.pulse_for(OutputChannel::Tilt, -90.0), 1000);
        assert_eq!(config.pulse_for(OutputChannel::Tilt, 30.0), 2000);
    }

    #[test]
    fn servo_output_sends_set_servo() {
        let mut transport = RecordingTransport::new();
        {
            let mut output = ServoOutput::new(ServoConfig::default(), &mut transport);
            output.write(OutputChannel::Green, 100.0);
            output.write(OutputChannel::Pan, 90.0);
        }
        assert_eq!(
            transport.sent(),
            &[
                Command::SetServo {
                    channel: 10,
                    pwm: 2000
                },
                Command::SetServo {
                    channel: 12,
                    pwm: 1750
                },
            ]
        );
    }
}
