//! Session clock
//!
//! The session runs for a fixed number of discrete ticks. The clock counts
//! both directions: ticks elapsed since start (used to stamp events) and
//! ticks remaining (the countdown the player sees, and the win condition).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Countdown clock for one session
///
/// # Example
/// ```
/// use surveillance_core::SessionClock;
///
/// let mut clock = SessionClock::new(3, 50);
/// assert_eq!(clock.time_remaining(), 3);
///
/// clock.advance_tick();
/// assert_eq!(clock.time_remaining(), 2);
/// assert_eq!(clock.current_tick(), 1);
/// assert!(!clock.is_expired());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClock {
    /// Ticks advanced since session start
    current_tick: u64,
    /// Ticks left before time runs out
    time_remaining: u32,
    /// Configured session length in ticks
    duration_ticks: u32,
    /// Wall-clock length of one tick
    tick_interval_ms: u64,
}

impl SessionClock {
    /// Create a clock for a session of `duration_ticks` ticks of `tick_interval_ms` each
    ///
    /// # Panics
    /// Panics if `tick_interval_ms` is zero.
    pub fn new(duration_ticks: u32, tick_interval_ms: u64) -> Self {
        assert!(tick_interval_ms > 0, "tick_interval_ms must be positive");
        Self {
            current_tick: 0,
            time_remaining: duration_ticks,
            duration_ticks,
            tick_interval_ms,
        }
    }

    /// Advance one tick. The countdown saturates at zero.
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
        self.time_remaining = self.time_remaining.saturating_sub(1);
    }

    /// Ticks advanced since start
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Ticks left on the countdown
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Configured session length
    pub fn duration_ticks(&self) -> u32 {
        self.duration_ticks
    }

    /// True once the countdown has reached zero
    pub fn is_expired(&self) -> bool {
        self.time_remaining == 0
    }

    /// Wall-clock length of one tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Remaining time in whole seconds, rounded up (countdown display)
    pub fn seconds_remaining(&self) -> u64 {
        let millis = self.time_remaining as u64 * self.tick_interval_ms;
        millis.div_ceil(1000)
    }

    /// Fraction of the session already played, in [0.0, 1.0]
    pub fn progress(&self) -> f64 {
        if self.duration_ticks == 0 {
            return 1.0;
        }
        1.0 - self.time_remaining as f64 / self.duration_ticks as f64
    }
}
