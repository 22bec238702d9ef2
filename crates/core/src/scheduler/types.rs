//! Core types for the cooperative scheduler
//!
//! - Task handles and lifecycle status
//! - The step result a routine returns after each run
//! - Events and statistics reported back to the host

use core::fmt;

/// Smallest delay a routine can re-arm with, in milliseconds.
///
/// A re-arm of 0 ms is raised to this value so a routine never runs twice
/// for the same timestamp.
pub const MIN_REARM_MS: u32 = 1;

/// Opaque handle to a scheduled task, unique among live tasks.
///
/// Handles increase monotonically; their order is the registration order
/// used to break ties between tasks due at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(pub(crate) u32);

impl TaskHandle {
    /// Raw handle value, for logging.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Task lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for its due time
    Scheduled,
    /// Currently executing a step
    Running,
    /// Finished (normally or by fault); never dispatched again
    Completed,
    /// Cancelled by the host or the action registry; never dispatched again
    Cancelled,
}

impl TaskStatus {
    /// True for `Completed` and `Cancelled`.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

/// What a routine wants after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Run again after this many milliseconds
    Rearm(u32),
    /// Finished; release the task
    Done,
}

/// Failure raised by a routine step.
///
/// The scheduler never retries a faulted routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutineFault {
    /// Required telemetry (position, distance) is not available
    TelemetryUnavailable,
    /// Routine state is inconsistent
    InvalidState(&'static str),
}

impl fmt::Display for RoutineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutineFault::TelemetryUnavailable => write!(f, "telemetry unavailable"),
            RoutineFault::InvalidState(reason) => write!(f, "invalid state: {}", reason),
        }
    }
}

/// Scheduler errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    /// The task table is at capacity
    Full,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::Full => write!(f, "task table full"),
        }
    }
}

/// Events produced by a tick, for logging by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A routine returned [`Step::Done`]
    Completed {
        handle: TaskHandle,
        name: &'static str,
    },
    /// A routine returned an error and was terminated
    Faulted {
        handle: TaskHandle,
        name: &'static str,
        fault: RoutineFault,
    },
}

/// Scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Total routine steps executed
    pub executions: u64,
    /// Tasks that finished normally
    pub completions: u32,
    /// Tasks terminated by a fault
    pub faults: u32,
    /// Tasks cancelled before finishing
    pub cancellations: u32,
    /// Highest number of simultaneously live tasks
    pub peak_live: u32,
}

impl SchedulerStats {
    pub(crate) fn record_live(&mut self, live: usize) {
        self.peak_live = self.peak_live.max(live as u32);
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
