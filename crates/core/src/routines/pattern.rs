//! Light pattern generators
//!
//! Each pattern is a small state machine advanced one step per run:
//!
//! | Pattern   | Phase                  | Cadence          |
//! |-----------|------------------------|------------------|
//! | Strobe    | on/off toggle          | `1000 / speed` ms |
//! | Alternate | red → green → blue     | `2000 / speed` ms |
//! | Pulse     | triangle-wave level    | 100 ms           |
//! | Rainbow   | hue angle, wraps 360°  | 100 ms           |
//! | Solid/Off | none (one shot)        | -                |

use crate::output::{reset_channels, Channels};
use crate::scheduler::{Routine, RoutineContext, RoutineFault, Step};

use super::color::{hsv_to_rgb, Rgb};

/// Cadence of the pulse and rainbow patterns
pub const SMOOTH_PATTERN_CADENCE_MS: u32 = 100;

/// Light pattern selector.
///
/// Numeric ids are used by raw mission configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternKind {
    Off = 0,
    Solid = 1,
    Strobe = 2,
    Alternate = 3,
    Pulse = 4,
    Rainbow = 5,
}

impl PatternKind {
    /// Look up a pattern by id; `None` for unknown ids.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(PatternKind::Off),
            1 => Some(PatternKind::Solid),
            2 => Some(PatternKind::Strobe),
            3 => Some(PatternKind::Alternate),
            4 => Some(PatternKind::Pulse),
            5 => Some(PatternKind::Rainbow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Off => "lights_off",
            PatternKind::Solid => "solid",
            PatternKind::Strobe => "strobe",
            PatternKind::Alternate => "alternate",
            PatternKind::Pulse => "pulse",
            PatternKind::Rainbow => "rainbow",
        }
    }
}

/// Current phase of a running pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatternPhase {
    /// Strobe: whether the light is currently on
    Toggle { on: bool },
    /// Alternate: index of the next primary color
    Cycle { index: u8 },
    /// Pulse: brightness level (percent) and ramp direction
    Breathe { level: u8, rising: bool },
    /// Rainbow: hue in degrees
    Hue { degrees: f32 },
    /// Solid and off patterns
    Static,
}

/// Per-task pattern state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternState {
    pub phase: PatternPhase,
    /// Level or hue increment per step
    pub step: f32,
    /// Delay between steps
    pub cadence_ms: u32,
    started_at: Option<u64>,
}

const CYCLE_COLORS: [Rgb; 3] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];

/// A running light pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightPattern {
    kind: PatternKind,
    color: Rgb,
    duration_ms: Option<u32>,
    state: PatternState,
}

impl LightPattern {
    /// Build a pattern.
    ///
    /// `speed` is expected to be pre-clamped by the caller; 0 is raised to
    /// 1. `color` is used by solid, strobe and pulse. A pattern with a
    /// `duration_ms` turns the lights off and finishes once it elapses.
    pub fn new(kind: PatternKind, speed: u8, color: Rgb, duration_ms: Option<u32>) -> Self {
        let speed = speed.max(1) as u32;
        let (phase, step, cadence_ms) = match kind {
            PatternKind::Strobe => (PatternPhase::Toggle { on: false }, 1.0, 1000 / speed),
            PatternKind::Alternate => (PatternPhase::Cycle { index: 0 }, 1.0, 2000 / speed),
            PatternKind::Pulse => (
                PatternPhase::Breathe {
                    level: 0,
                    rising: true,
                },
                (2 * speed).min(50) as f32,
                SMOOTH_PATTERN_CADENCE_MS,
            ),
            PatternKind::Rainbow => (
                PatternPhase::Hue { degrees: 0.0 },
                (2 * speed) as f32,
                SMOOTH_PATTERN_CADENCE_MS,
            ),
            PatternKind::Solid | PatternKind::Off => (PatternPhase::Static, 0.0, 0),
        };

        Self {
            kind,
            color,
            duration_ms,
            state: PatternState {
                phase,
                step,
                cadence_ms: cadence_ms.max(1),
                started_at: None,
            },
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn state(&self) -> &PatternState {
        &self.state
    }

    fn advance(&mut self) -> Rgb {
        let step = self.state.step;
        match &mut self.state.phase {
            PatternPhase::Toggle { on } => {
                *on = !*on;
                if *on {
                    self.color
                } else {
                    Rgb::OFF
                }
            }
            PatternPhase::Cycle { index } => {
                let color = CYCLE_COLORS[*index as usize % CYCLE_COLORS.len()];
                *index = (*index + 1) % CYCLE_COLORS.len() as u8;
                color
            }
            PatternPhase::Breathe { level, rising } => {
                let out = self.color.scaled(*level);
                let step = step as u8;
                if *rising {
                    *level = level.saturating_add(step).min(100);
                    if *level == 100 {
                        *rising = false;
                    }
                } else {
                    *level = level.saturating_sub(step);
                    if *level == 0 {
                        *rising = true;
                    }
                }
                out
            }
            PatternPhase::Hue { degrees } => {
                let out = hsv_to_rgb(*degrees, 100.0, 100.0);
                *degrees = (*degrees + step) % 360.0;
                out
            }
            PatternPhase::Static => match self.kind {
                PatternKind::Off => Rgb::OFF,
                _ => self.color,
            },
        }
    }
}

impl Routine for LightPattern {
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        let started = *self.state.started_at.get_or_insert(now_ms);

        if let Some(duration) = self.duration_ms {
            if now_ms.saturating_sub(started) >= duration as u64 {
                reset_channels(ctx.outputs, Channels::LIGHT);
                return Ok(Step::Done);
            }
        }

        self.advance().write_to(ctx.outputs);

        if self.state.phase == PatternPhase::Static {
            Ok(Step::Done)
        } else {
            Ok(Step::Rearm(self.state.cadence_ms))
        }
    }

    fn channels(&self) -> Channels {
        Channels::LIGHT
    }

    fn name(&self) -> &'static str {
        self.kind.name()
    }
}
