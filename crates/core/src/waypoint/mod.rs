//! Waypoint arrival detection
//!
//! Turns continuous "distance to active waypoint" telemetry into a one-shot
//! arrival signal per waypoint visit.

pub mod detector;

pub use detector::{ArrivalDetector, DetectorConfig, ModeMask, WaypointEdge};
