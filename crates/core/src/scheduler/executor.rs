//! Cooperative task scheduler
//!
//! Single-threaded, host-driven: the control loop calls [`Scheduler::tick`]
//! with the current time and every due task runs exactly once, in ascending
//! due time with ties broken by registration order. Nothing blocks; waiting
//! is expressed as re-arming with a delay.

use heapless::Vec;

use crate::output::Channels;

use super::routine::{Routine, RoutineContext};
use super::types::{
    SchedulerError, SchedulerEvent, SchedulerStats, Step, TaskHandle, TaskStatus, MIN_REARM_MS,
};

/// Task table entry.
struct Task<R> {
    handle: TaskHandle,
    next_due_at: u64,
    status: TaskStatus,
    routine: R,
}

/// Fixed-capacity cooperative scheduler for up to `N` live tasks.
pub struct Scheduler<R, const N: usize> {
    tasks: Vec<Task<R>, N>,
    next_handle: u32,
    now_ms: u64,
    stats: SchedulerStats,
}

impl<R: Routine, const N: usize> Default for Scheduler<R, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Routine, const N: usize> Scheduler<R, N> {
    /// Create an empty scheduler with its clock at 0.
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 1,
            now_ms: 0,
            stats: SchedulerStats {
                executions: 0,
                completions: 0,
                faults: 0,
                cancellations: 0,
                peak_live: 0,
            },
        }
    }

    /// Time of the most recent tick.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Register a routine to first run `initial_delay_ms` after the most
    /// recent tick.
    ///
    /// The routine never runs synchronously here; with a delay of 0 it runs
    /// on the next [`tick`](Self::tick).
    pub fn schedule(&mut self, routine: R, initial_delay_ms: u32) -> Result<TaskHandle, SchedulerError> {
        let due = self.now_ms.saturating_add(initial_delay_ms as u64);
        self.schedule_at(routine, due)
    }

    /// Register a routine to first run at an absolute time.
    pub fn schedule_at(&mut self, routine: R, due_at_ms: u64) -> Result<TaskHandle, SchedulerError> {
        let handle = TaskHandle(self.next_handle);
        self.tasks
            .push(Task {
                handle,
                next_due_at: due_at_ms,
                status: TaskStatus::Scheduled,
                routine,
            })
            .map_err(|_| SchedulerError::Full)?;
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        self.stats.record_live(self.tasks.len());
        Ok(handle)
    }

    /// Run every task due at or before `now_ms`, once each.
    ///
    /// Returns the completion and fault events produced by this tick.
    /// A faulting routine is terminated; its siblings still run.
    pub fn tick(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Vec<SchedulerEvent, N> {
        let mut events = Vec::new();
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;

        // Snapshot the due set so re-armed tasks cannot run twice this tick
        let mut due: Vec<(u64, TaskHandle), N> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Scheduled && t.next_due_at <= now)
            .map(|t| (t.next_due_at, t.handle))
            .collect();
        due.sort_unstable();

        for (_, handle) in due.iter() {
            let Some(task) = self.tasks.iter_mut().find(|t| t.handle == *handle) else {
                continue;
            };
            if task.status != TaskStatus::Scheduled {
                continue;
            }

            task.status = TaskStatus::Running;
            let result = task.routine.run(now, ctx);
            self.stats.executions = self.stats.executions.saturating_add(1);

            match result {
                Ok(Step::Rearm(delay)) => {
                    task.status = TaskStatus::Scheduled;
                    task.next_due_at = now.saturating_add(delay.max(MIN_REARM_MS) as u64);
                }
                Ok(Step::Done) => {
                    task.status = TaskStatus::Completed;
                    self.stats.completions = self.stats.completions.saturating_add(1);
                    let _ = events.push(SchedulerEvent::Completed {
                        handle: task.handle,
                        name: task.routine.name(),
                    });
                }
                Err(fault) => {
                    task.status = TaskStatus::Completed;
                    self.stats.faults = self.stats.faults.saturating_add(1);
                    let _ = events.push(SchedulerEvent::Faulted {
                        handle: task.handle,
                        name: task.routine.name(),
                        fault,
                    });
                }
            }
        }

        // Release finished tasks
        self.tasks.retain(|t| !t.status.is_terminal());
        events
    }

    /// Cancel a task. Returns false if the handle is not live.
    ///
    /// Idempotent: cancelling a finished or already cancelled task is a
    /// no-op.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| t.handle == handle) else {
            return false;
        };
        self.tasks[pos].status = TaskStatus::Cancelled;
        self.tasks.swap_remove(pos);
        self.stats.cancellations = self.stats.cancellations.saturating_add(1);
        true
    }

    /// Cancel every live task whose routine writes any of `channels`.
    ///
    /// Returns the union of channels owned by the cancelled tasks.
    pub fn cancel_conflicting(&mut self, channels: Channels) -> Channels {
        let mut released = Channels::empty();
        let before = self.tasks.len();
        self.tasks.retain(|t| {
            let owned = t.routine.channels();
            if owned.intersects(channels) {
                released |= owned;
                false
            } else {
                true
            }
        });
        let cancelled = (before - self.tasks.len()) as u32;
        self.stats.cancellations = self.stats.cancellations.saturating_add(cancelled);
        released
    }

    /// Cancel every live task. Returns the union of their channels.
    pub fn cancel_all(&mut self) -> Channels {
        let released = self
            .tasks
            .iter()
            .fold(Channels::empty(), |acc, t| acc | t.routine.channels());
        let cancelled = self.tasks.len() as u32;
        self.tasks.clear();
        self.stats.cancellations = self.stats.cancellations.saturating_add(cancelled);
        released
    }

    /// Status of a live task; `None` once it has been released.
    pub fn status(&self, handle: TaskHandle) -> Option<TaskStatus> {
        self.find(handle).map(|t| t.status)
    }

    /// True while the task is scheduled or running.
    pub fn is_live(&self, handle: TaskHandle) -> bool {
        self.find(handle).is_some()
    }

    /// Next due time of a live task.
    pub fn next_due_at(&self, handle: TaskHandle) -> Option<u64> {
        self.find(handle).map(|t| t.next_due_at)
    }

    /// Borrow the routine of a live task.
    pub fn routine(&self, handle: TaskHandle) -> Option<&R> {
        self.find(handle).map(|t| &t.routine)
    }

    /// Number of live tasks.
    pub fn live_count(&self) -> usize {
        self.tasks.len()
    }

    /// Handles of all live tasks, in registration order.
    pub fn live_handles(&self) -> Vec<TaskHandle, N> {
        let mut handles: Vec<TaskHandle, N> = self.tasks.iter().map(|t| t.handle).collect();
        handles.sort_unstable();
        handles
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    fn find(&self, handle: TaskHandle) -> Option<&Task<R>> {
        self.tasks.iter().find(|t| t.handle == handle)
    }
}
