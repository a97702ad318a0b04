use std::time::{Duration, Instant};

/// Checkpoint of an interval-bound accumulator.
///
/// Nothing runs in the background: expiry is only noticed when
/// [`roll`](ResetWindow::roll) is called with the time of the next sample.
#[derive(Debug, Clone)]
pub struct ResetWindow {
    length: Duration,
    checkpoint: Instant,
}

impl ResetWindow {
    pub fn new(length: Duration, now: Instant) -> Self {
        ResetWindow {
            length,
            checkpoint: now,
        }
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// Start a new window at `now` if the current one has expired.
    ///
    /// Returns `true` when the caller must reset its state before folding
    /// in the sample taken at `now`.
    pub fn roll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.checkpoint) > self.length {
            self.checkpoint = now;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.checkpoint = now;
    }
}
