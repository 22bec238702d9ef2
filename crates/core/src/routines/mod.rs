//! Routine library
//!
//! Concrete [`Routine`](crate::scheduler::Routine) implementations bound to
//! waypoints by the action registry.
//!
//! - [`pattern`]: Light patterns (off, solid, strobe, alternate, pulse, rainbow)
//! - [`camera`]: Gimbal sweep, target tracking, photo and recording
//! - [`flight`]: Timed mode revert and grid survey
//! - [`color`]: RGB levels and HSV conversion

pub mod camera;
pub mod color;
pub mod flight;
pub mod pattern;

pub use camera::{CameraSweep, Photo, PointGimbal, TargetTracking, TimedRecording};
pub use color::{hsv_to_rgb, Rgb};
pub use flight::{GridSurvey, SurveyGrid, TimedModeRevert};
pub use pattern::{LightPattern, PatternKind};
