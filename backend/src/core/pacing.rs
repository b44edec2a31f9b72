//! Fixed-step pacing for hosts that run a frame loop
//!
//! The session itself knows nothing about wall-clock time: it advances only
//! when `advance()` is called. A host that renders at a variable frame rate
//! feeds each frame's elapsed time into a [`TickPacer`] and calls
//! `advance()` once per returned tick.

use std::time::Duration;

/// Accumulates wall-clock time and releases whole ticks
///
/// # Example
/// ```
/// use std::time::Duration;
/// use surveillance_core::TickPacer;
///
/// let mut pacer = TickPacer::new(Duration::from_millis(50));
/// assert_eq!(pacer.due_ticks(Duration::from_millis(120)), 2);
/// // 20 ms carried over
/// assert_eq!(pacer.due_ticks(Duration::from_millis(30)), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TickPacer {
    interval: Duration,
    accumulated: Duration,
    max_catch_up: u32,
}

impl TickPacer {
    /// Default cap on ticks released for a single frame (stalls are dropped, not replayed)
    pub const DEFAULT_MAX_CATCH_UP: u32 = 10;

    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "tick interval must be positive");
        Self {
            interval,
            accumulated: Duration::ZERO,
            max_catch_up: Self::DEFAULT_MAX_CATCH_UP,
        }
    }

    /// Override the per-frame catch-up cap
    pub fn with_max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    /// Add `elapsed` wall time and return how many ticks are now due
    pub fn due_ticks(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            due += 1;
            if due == self.max_catch_up {
                self.accumulated = Duration::ZERO;
                break;
            }
        }
        due
    }

    /// Time until the next tick becomes due
    pub fn until_next_tick(&self) -> Duration {
        self.interval.saturating_sub(self.accumulated)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
