//! Sleep abstraction for cancellable waits.
//!
//! All orchestrator waits (link-up poll cadence, ping retry backoff) go
//! through the `Sleeper` trait so tests run without real delays. The
//! orchestrator slices long waits into short chunks and checks for
//! cancellation between chunks; implementations here only ever sleep
//! one chunk at a time.

use std::sync::Mutex;
use std::time::Duration;

/// Trait for sleeping between polls and retries.
pub trait Sleeper: Send + Sync {
    /// Sleep for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSleeper;

impl RealSleeper {
    pub fn new() -> Self {
        Self
    }
}

impl Sleeper for RealSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Mock sleeper that returns immediately and records requested sleep
/// time, so tests can assert on total wait without waiting.
#[derive(Debug, Default)]
pub struct MockSleeper {
    slept: Mutex<Duration>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total sleep time requested so far.
    pub fn total_slept(&self) -> Duration {
        *self.slept.lock().unwrap()
    }
}

impl Sleeper for MockSleeper {
    fn sleep(&self, duration: Duration) {
        *self.slept.lock().unwrap() += duration;
    }
}
