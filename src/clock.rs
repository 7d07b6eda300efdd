//! Monotonic time source for the game loop.
//!
//! Wraps `std::time::Instant` and tracks the timestamp of the last poll so the
//! loop can measure per-iteration deltas and compute its pacing deadline.

use std::time::Instant;

/// Monotonic clock measuring seconds since construction.
///
/// `elapsed` is the only mutating operation: it returns the wall time since
/// the previous poll and moves the poll mark forward. The mark also serves as
/// the reference point for frame pacing (`last_poll`).
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_poll: f64,
}

impl Clock {
    /// Create a clock whose poll mark is "now".
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_poll: 0.0,
        }
    }

    /// Seconds since the clock was created.
    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Seconds since the previous poll; advances the poll mark.
    pub fn elapsed(&mut self) -> f32 {
        let time = self.now();
        let elapsed = (time - self.last_poll) as f32;
        self.last_poll = time;
        elapsed
    }

    /// Timestamp of the last poll, in seconds since construction.
    pub fn last_poll(&self) -> f64 {
        self.last_poll
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
