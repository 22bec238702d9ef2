//! Time abstraction for the action scheduler.
//!
//! The scheduler and every routine work in monotonic milliseconds. The host
//! supplies the clock; tests drive it by hand through [`MockTime`].

use core::cell::Cell;

/// Monotonic millisecond clock supplied by the host platform.
///
/// # Example
///
/// ```
/// use trail_actions_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::with_initial(1_000);
/// time.advance(250);
/// assert_eq!(time.now_ms(), 1_250);
/// assert_eq!(time.elapsed_ms_since(1_000), 250);
/// ```
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns elapsed milliseconds since a reference timestamp.
    ///
    /// Saturates to zero when the reference lies in the future.
    fn elapsed_ms_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Hand-driven clock for host tests.
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    /// Creates a clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock starting at the given timestamp.
    pub fn with_initial(ms: u64) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the clock to an absolute timestamp.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the clock.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get().saturating_add(ms));
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}
