//! Waypoint action registry
//!
//! Maps waypoint indices to [`ActionBinding`]s. At most one binding per
//! index; registering an index again replaces its binding.
//!
//! Dispatch enforces cancel-before-start: any live task writing an output
//! channel the new action needs is cancelled and those channels are driven
//! to zero before the new task is scheduled.

use core::fmt;

use heapless::index_map::FnvIndexMap;

use crate::output::{reset_channels, Channels, OutputSink};
use crate::parameters::ActionParams;
use crate::scheduler::{Routine, Scheduler, SchedulerError, TaskHandle};

use super::action::{Action, ActionSpec};

/// Registry errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// Light pattern id outside 0..=5
    UnknownPattern(u8),
    /// No room for another waypoint binding
    RegistryFull,
    /// The scheduler rejected the task
    Scheduler(SchedulerError),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::UnknownPattern(id) => write!(f, "unknown light pattern id {}", id),
            ActionError::RegistryFull => write!(f, "action registry full"),
            ActionError::Scheduler(e) => write!(f, "scheduler: {}", e),
        }
    }
}

impl From<SchedulerError> for ActionError {
    fn from(e: SchedulerError) -> Self {
        ActionError::Scheduler(e)
    }
}

/// Action bound to one waypoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionBinding {
    pub spec: ActionSpec,
    /// Delay between arrival and the first step
    pub delay_ms: u32,
}

/// Result of a dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No binding for this waypoint
    Unmapped,
    /// Task scheduled; `replaced` holds the channels freed from cancelled tasks
    Scheduled { handle: TaskHandle, replaced: Channels },
}

/// Waypoint index to action table with capacity `N` (power of two).
pub struct ActionRegistry<const N: usize> {
    bindings: FnvIndexMap<u16, ActionBinding, N>,
}

impl<const N: usize> Default for ActionRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ActionRegistry<N> {
    pub fn new() -> Self {
        Self {
            bindings: FnvIndexMap::new(),
        }
    }

    /// Bind `spec` to `index`, returning the binding it replaced.
    pub fn register(
        &mut self,
        index: u16,
        spec: ActionSpec,
        delay_ms: u32,
    ) -> Result<Option<ActionBinding>, ActionError> {
        self.bindings
            .insert(index, ActionBinding { spec, delay_ms })
            .map_err(|_| ActionError::RegistryFull)
    }

    pub fn unregister(&mut self, index: u16) -> Option<ActionBinding> {
        self.bindings.remove(&index)
    }

    pub fn get(&self, index: u16) -> Option<&ActionBinding> {
        self.bindings.get(&index)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Build and schedule the action bound to `index`.
    ///
    /// Unmapped indices are not an error. The new task never runs inside
    /// this call; its first step happens on a later scheduler tick.
    pub fn dispatch<const S: usize>(
        &self,
        index: u16,
        params: &ActionParams,
        scheduler: &mut Scheduler<Action, S>,
        outputs: &mut dyn OutputSink,
    ) -> Result<DispatchOutcome, ActionError> {
        let Some(binding) = self.bindings.get(&index) else {
            return Ok(DispatchOutcome::Unmapped);
        };

        let action = binding.spec.build(params);
        let needed = action.channels();
        let replaced = if needed.is_empty() {
            Channels::empty()
        } else {
            scheduler.cancel_conflicting(needed)
        };
        reset_channels(outputs, replaced);

        let handle = scheduler.schedule(action, binding.delay_ms)?;
        Ok(DispatchOutcome::Scheduled { handle, replaced })
    }
}
