//! Platform-agnostic interfaces to the host autopilot.
//!
//! The action core reaches the outside world only through these traits:
//! a clock, read-only vehicle and mission telemetry, and an outbound
//! command channel.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (Embassy, SITL) live outside this crate

pub mod command;
pub mod time;
pub mod vehicle;

pub use command::{Command, CommandTransport, RecordingTransport};
pub use time::{MockTime, TimeSource};
pub use vehicle::{GeoPoint, MissionProgress, MockMission, MockVehicle, ModeCode, VehicleState};
