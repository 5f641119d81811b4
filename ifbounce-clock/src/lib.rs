//! Clock abstraction for ifbounce.
//!
//! All timing policy in the orchestrator (link-up deadlines, cycle
//! timestamps) is measured through the `Clock` trait so that tests can
//! drive time deterministically instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the current Unix timestamp in seconds.
pub trait Clock: Send + Sync {
    /// Returns the current time as Unix seconds since epoch.
    fn now_unix_sec(&self) -> u64;
}

/// Real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_sec(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_secs()
    }
}

/// Mock clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct MockClock {
    timestamp: u64,
}

impl MockClock {
    /// Create a mock clock frozen at `timestamp`.
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }
}

impl Clock for MockClock {
    fn now_unix_sec(&self) -> u64 {
        self.timestamp
    }
}

/// Mock clock that advances by a fixed step on every read.
///
/// Lets deadline loops make progress in tests without real sleeps: each
/// `now_unix_sec()` call observes the previous value and moves time
/// forward by `step`.
#[derive(Debug)]
pub struct AdvancingClock {
    timestamp: AtomicU64,
    step: u64,
}

impl AdvancingClock {
    /// Create an advancing clock starting at `start`, stepping by `step`
    /// seconds per read.
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            timestamp: AtomicU64::new(start),
            step,
        }
    }
}

impl Clock for AdvancingClock {
    fn now_unix_sec(&self) -> u64 {
        self.timestamp.fetch_add(self.step, Ordering::SeqCst)
    }
}
