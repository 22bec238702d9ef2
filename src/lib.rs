#![cfg_attr(not(test), no_std)]

//! trail_actions - Waypoint-triggered action dispatcher
//!
//! Host integration for [`trail_actions_core`]: logging, the
//! [`ActionDispatcher`](dispatcher::ActionDispatcher) that a flight
//! controller calls once per control-loop iteration, and an optional
//! Embassy loop driving it (`embassy` feature).

// Logging macros must be defined before the modules that use them
#[macro_use]
pub mod logging;

pub mod dispatcher;
pub mod log_buffer;

#[cfg(feature = "embassy")]
pub mod runtime;

pub use dispatcher::{ActionDispatcher, ActionIo};
pub use trail_actions_core as action_core;
