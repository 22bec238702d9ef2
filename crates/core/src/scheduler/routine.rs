//! Routine trait and the context passed to every step.

use crate::output::{Channels, OutputSink};
use crate::traits::{CommandTransport, VehicleState};

use super::types::{RoutineFault, Step};

/// Collaborators a routine may touch while it runs.
pub struct RoutineContext<'a> {
    pub vehicle: &'a dyn VehicleState,
    pub outputs: &'a mut dyn OutputSink,
    pub commands: &'a mut dyn CommandTransport,
}

/// A resumable unit of work driven by the scheduler.
///
/// Each call to [`run`](Routine::run) performs one short, bounded step and
/// either finishes or asks to be re-armed after a delay. All state that must
/// survive between steps lives in the implementing value, which the task
/// owns exclusively. A step must never block or sleep.
pub trait Routine {
    /// Execute one step at `now_ms`.
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault>;

    /// Output channels this routine writes.
    fn channels(&self) -> Channels {
        Channels::empty()
    }

    /// Name for logs.
    fn name(&self) -> &'static str;
}
