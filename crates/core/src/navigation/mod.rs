//! Navigation math used by routines
//!
//! Great-circle distance/bearing, angle wrapping, local offsets and gimbal
//! pointing.

mod geo;

pub use geo::{distance_bearing, gimbal_angles, offset, wrap_180};
