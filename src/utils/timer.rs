//! Timer utilities
//!
//! Provides timing and time-budget helpers.

use std::time::{Duration, Instant};

/// Simple timer for measuring elapsed time
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and return elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!("{}: {}ms", self.label, elapsed.as_millis());
        elapsed
    }
}

/// Wall-clock budget of a time-bound run
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    total: Duration,
    start: Instant,
}

impl TimeBudget {
    /// Start spending `total` now
    pub fn start(total: Duration) -> Self {
        Self {
            total,
            start: Instant::now(),
        }
    }

    /// Seconds left; negative once the budget is overrun
    pub fn remaining_secs(&self) -> f64 {
        self.total.as_secs_f64() - self.start.elapsed().as_secs_f64()
    }

    /// Whether another iteration should start, given how long the last one took
    pub fn allows(&self, last_iteration: Duration) -> bool {
        allows_next(self.total, self.start.elapsed(), last_iteration)
    }
}

/// Start another iteration only while the time left exceeds the last
/// iteration's duration. A zero `last_iteration` means none has run yet.
pub fn allows_next(total: Duration, elapsed: Duration, last_iteration: Duration) -> bool {
    match total.checked_sub(elapsed) {
        Some(remaining) => remaining > last_iteration,
        None => false,
    }
}
