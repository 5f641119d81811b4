//! Trait-based logging for deterministic tests.
//!
//! Progress output goes through a `Logger` trait instead of a global
//! logging facade, so tests can capture and assert on what the run
//! reported without touching process-wide state.

use std::io::Write;
use std::sync::{Arc, RwLock};

/// Verbosity level, from the `-v` flag count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Always shown: cycle banners, outcomes, the final summary.
    Normal,
    /// `-v`: per-attempt progress (flap attempts, poll ticks, probes).
    Verbose,
    /// `-vv`: raw device commands and output echoes.
    Debug,
}

impl Verbosity {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Trait for progress output.
pub trait Logger: Send + Sync {
    fn log(&self, level: Verbosity, message: &str);

    fn info(&self, message: &str) {
        self.log(Verbosity::Normal, message);
    }

    fn verbose(&self, message: &str) {
        self.log(Verbosity::Verbose, message);
    }

    fn debug(&self, message: &str) {
        self.log(Verbosity::Debug, message);
    }
}

/// Logger writing to stderr, filtered by level.
#[derive(Debug)]
pub struct StderrLogger {
    level: Verbosity,
}

impl StderrLogger {
    pub fn new(level: Verbosity) -> Self {
        Self { level }
    }
}

impl Logger for StderrLogger {
    fn log(&self, level: Verbosity, message: &str) {
        if level <= self.level {
            let _ = writeln!(std::io::stderr(), "{}", message);
        }
    }
}

/// A captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Verbosity,
    pub message: String,
}

/// Capturing logger for tests. Records every message regardless of
/// level so tests can assert on would-be output.
#[derive(Debug, Clone, Default)]
pub struct MockLogger {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl MockLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries, in order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Just the message text of every entry.
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// True if any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Logger for MockLogger {
    fn log(&self, level: Verbosity, message: &str) {
        self.entries.write().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Verbosity, _message: &str) {}
}
