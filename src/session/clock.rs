//! Time sources for running sessions

use jiff::{SignedDuration, Timestamp};
use tokio::time::Instant;

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Monotonic time anchored to the wall clock when created.
///
/// Follows tokio's clock, so it cannot jump when the system time is adjusted and it advances
/// with the paused clock in `#[tokio::test(start_paused = true)]` tests.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
    epoch: Timestamp,
}

impl TokioClock {
    /// Anchor a new clock at the current instant.
    pub fn new() -> Self {
        Self::anchored_at(Timestamp::now())
    }

    /// Anchor a new clock so that the current instant reads as `epoch`.
    pub fn anchored_at(epoch: Timestamp) -> Self {
        Self {
            origin: Instant::now(),
            epoch,
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        let elapsed =
            SignedDuration::try_from(self.origin.elapsed()).unwrap_or(SignedDuration::MAX);

        self.epoch.checked_add(elapsed).unwrap_or(self.epoch)
    }
}
