//! Waypoint action registry and action variants
//!
//! - [`action`]: [`ActionSpec`] (registered description) and [`Action`] (runnable routine)
//! - [`registry`]: [`ActionRegistry`] and cancel-before-start dispatch

pub mod action;
pub mod registry;

pub use action::{Action, ActionSpec};
pub use registry::{ActionBinding, ActionError, ActionRegistry, DispatchOutcome};
