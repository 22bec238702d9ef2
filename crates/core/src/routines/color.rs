//! Light colors and HSV conversion.

use libm::{fabsf, roundf};

use crate::output::{OutputChannel, OutputSink};

/// Light color with each component in percent (0-100).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(100, 100, 100);
    pub const RED: Rgb = Rgb::new(100, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 100, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 100);

    /// Components above 100 are clamped.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: if r > 100 { 100 } else { r },
            g: if g > 100 { 100 } else { g },
            b: if b > 100 { 100 } else { b },
        }
    }

    /// Color dimmed to `level` percent of itself.
    pub fn scaled(self, level: u8) -> Self {
        let level = level.min(100) as u16;
        let scale = |c: u8| ((c as u16 * level + 50) / 100) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// Write all three light channels.
    pub fn write_to(self, outputs: &mut dyn OutputSink) {
        outputs.write(OutputChannel::Red, self.r as f32);
        outputs.write(OutputChannel::Green, self.g as f32);
        outputs.write(OutputChannel::Blue, self.b as f32);
    }
}

/// Convert HSV to RGB.
///
/// `hue` is in degrees and wraps; `saturation` and `value` are percentages
/// clamped to 0-100. Sector based: chroma `c = v·s`,
/// `x = c·(1 - |(h/60 mod 2) - 1|)`, `m = v - c`.
///
/// ```
/// use trail_actions_core::routines::{hsv_to_rgb, Rgb};
/// assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), Rgb::new(0, 100, 0));
/// ```
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let mut h = hue % 360.0;
    if h < 0.0 {
        h += 360.0;
    }
    let s = saturation.clamp(0.0, 100.0) / 100.0;
    let v = value.clamp(0.0, 100.0) / 100.0;

    let c = v * s;
    let x = c * (1.0 - fabsf((h / 60.0) % 2.0 - 1.0));
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let to_percent = |f: f32| roundf((f + m) * 100.0).clamp(0.0, 100.0) as u8;
    Rgb::new(to_percent(r), to_percent(g), to_percent(b))
}
