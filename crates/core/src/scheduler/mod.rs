//! Cooperative scheduler for resumable routines
//!
//! # Components
//!
//! - [`types`]: Handles, status, step results, events, statistics
//! - [`routine`]: The [`Routine`] trait and its [`RoutineContext`]
//! - [`executor`]: The [`Scheduler`] task table
//!
//! # Example
//!
//! ```rust
//! use trail_actions_core::output::MockOutputs;
//! use trail_actions_core::scheduler::{Routine, RoutineContext, RoutineFault, Scheduler, Step};
//! use trail_actions_core::traits::{MockVehicle, RecordingTransport};
//!
//! struct Once;
//!
//! impl Routine for Once {
//!     fn run(&mut self, _now: u64, _ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
//!         Ok(Step::Done)
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "once"
//!     }
//! }
//!
//! let mut scheduler: Scheduler<Once, 4> = Scheduler::new();
//! let handle = scheduler.schedule(Once, 0).unwrap();
//!
//! let vehicle = MockVehicle::new();
//! let mut outputs = MockOutputs::new();
//! let mut commands = RecordingTransport::new();
//! let mut ctx = RoutineContext {
//!     vehicle: &vehicle,
//!     outputs: &mut outputs,
//!     commands: &mut commands,
//! };
//! scheduler.tick(0, &mut ctx);
//! assert!(!scheduler.is_live(handle));
//! ```

pub mod executor;
pub mod routine;
pub mod types;

pub use executor::Scheduler;
pub use routine::{Routine, RoutineContext};
pub use types::*;
