//! Signal handling for prompt, safe interruption.
//!
//! An operator interrupt must be observable at every wait point so the
//! restoration step runs promptly instead of after a full timeout. The
//! orchestrator polls a `ShutdownCheck` between every sleep slice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for checking whether the run should stop.
pub trait ShutdownCheck: Send + Sync {
    /// Returns true once an interrupt has been requested.
    fn should_stop(&self) -> bool;
}

/// Interrupt flag set by the SIGINT handler.
///
/// `new()` registers a Ctrl+C handler that flips the flag; the run loop
/// observes it at every suspension point. `manual()` skips handler
/// registration for tests and programmatic cancellation.
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownFlag {
    /// Create the flag and register a SIGINT handler.
    ///
    /// Registration failure (a handler may already be installed) is
    /// ignored; the returned flag can still be triggered manually.
    pub fn new() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let handler_flag = flag.clone();
        let _ = ctrlc::set_handler(move || {
            handler_flag.store(true, Ordering::SeqCst);
        });
        Self { flag }
    }

    /// Create the flag without touching signal handlers.
    pub fn manual() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request shutdown.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl ShutdownCheck for ShutdownFlag {
    fn should_stop(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Checker that never requests shutdown (tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverShutdown;

impl ShutdownCheck for NeverShutdown {
    fn should_stop(&self) -> bool {
        false
    }
}

/// Checker that is already shut down (tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysShutdown;

impl ShutdownCheck for AlwaysShutdown {
    fn should_stop(&self) -> bool {
        true
    }
}

/// Checker that trips after a fixed number of queries.
///
/// Lets tests deliver a cancellation "mid-poll": the Nth suspension
/// point observes the interrupt.
#[derive(Debug)]
pub struct CountdownShutdown {
    remaining: std::sync::atomic::AtomicUsize,
}

impl CountdownShutdown {
    /// Shutdown becomes visible on the `checks_before_stop + 1`-th query.
    pub fn after(checks_before_stop: usize) -> Self {
        Self {
            remaining: std::sync::atomic::AtomicUsize::new(checks_before_stop),
        }
    }
}

impl ShutdownCheck for CountdownShutdown {
    fn should_stop(&self) -> bool {
        let prev = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                Some(v.saturating_sub(1))
            })
            .unwrap_or(0);
        prev == 0
    }
}
