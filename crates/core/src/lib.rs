//! trail_actions_core - Pure no_std logic for waypoint-triggered actions
//!
//! This crate contains the platform-agnostic scheduling and detection core
//! and can be tested on host without any feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Vehicle, mission, commands and outputs are
//!   injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Time, vehicle, mission and command interfaces plus mocks
//! - [`scheduler`]: Cooperative scheduler for resumable routines
//! - [`waypoint`]: One-shot waypoint arrival detector
//! - [`actions`]: Waypoint to action registry
//! - [`routines`]: Light, camera and flight routines
//! - [`output`]: Output channels and the output sink interface
//! - [`servo`]: Output value to PWM mapping
//! - [`navigation`]: Great-circle distance, bearing and gimbal angles
//! - [`parameters`]: Parameter store and action parameters

#![no_std]

pub mod actions;
pub mod navigation;
pub mod output;
pub mod parameters;
pub mod routines;
pub mod scheduler;
pub mod servo;
pub mod traits;
pub mod waypoint;
