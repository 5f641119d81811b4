//! Reachability probing.
//!
//! Sends a single probe packet through the device CLI and reduces the
//! vendor ping output to a plain reachable/unreachable answer. The
//! surveyed vendor outputs disagree on wording, so all recognized forms
//! are parsed here and nowhere else.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::flavor::CliFlavor;
use crate::transport::{CommandRunner, TransportError};

/// Result of a reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable,
}

/// Trait for probing end-to-end reachability of an address.
pub trait ReachabilityProber: Send + Sync {
    /// Send one probe to `address`, optionally scoped to a routing
    /// context (VRF).
    fn probe(&self, address: &str, context: Option<&str>)
        -> Result<Reachability, TransportError>;
}

/// Prober that issues a vendor ping command and parses the reply.
#[derive(Debug)]
pub struct PingProber<R> {
    runner: R,
    flavor: CliFlavor,
}

impl<R: CommandRunner> PingProber<R> {
    pub fn new(runner: R, flavor: CliFlavor) -> Self {
        Self { runner, flavor }
    }
}

impl<R: CommandRunner> ReachabilityProber for PingProber<R> {
    fn probe(
        &self,
        address: &str,
        context: Option<&str>,
    ) -> Result<Reachability, TransportError> {
        let command = self.flavor.ping_command(address, context);
        let output = self.runner.run(&command)?;
        Ok(parse_ping_output(&output))
    }
}

/// Parse vendor ping output into a reachability answer.
///
/// Recognized success forms, in order of reliability:
/// - a received-packet count ("1 received" / "1 packets received")
/// - "Success rate is 100 percent"
/// - at least one `!` echo marker without a total-loss line
fn parse_ping_output(output: &str) -> Reachability {
    if output.contains("1 received") || output.contains("1 packets received") {
        return Reachability::Reachable;
    }
    if output.contains("0 received") || output.contains("0 packets received") {
        return Reachability::Unreachable;
    }
    if output.contains("Success rate is 100 percent") {
        return Reachability::Reachable;
    }
    if output.contains('!') && !output.contains("100.00% packet loss") {
        return Reachability::Reachable;
    }
    Reachability::Unreachable
}

/// Scripted reachability prober for tests.
///
/// Plays back queued results, then settles on a fallback. Counts probes
/// issued and remembers the last context it was called with.
#[derive(Debug)]
pub struct MockReachabilityProber {
    script: Mutex<VecDeque<Result<Reachability, TransportError>>>,
    fallback: Reachability,
    probes: AtomicUsize,
    last_context: Mutex<Option<String>>,
}

impl MockReachabilityProber {
    /// Prober that answers `fallback` once any scripted results run out.
    pub fn new(fallback: Reachability) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            probes: AtomicUsize::new(0),
            last_context: Mutex::new(None),
        }
    }

    /// Prober for which every probe succeeds.
    pub fn always_reachable() -> Self {
        Self::new(Reachability::Reachable)
    }

    /// Prober for which every probe fails.
    pub fn never_reachable() -> Self {
        Self::new(Reachability::Unreachable)
    }

    /// Queue a probe result to report before falling back.
    pub fn push_result(&self, result: Reachability) {
        self.script.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of probes issued.
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Routing context passed to the most recent probe.
    pub fn last_context(&self) -> Option<String> {
        self.last_context.lock().unwrap().clone()
    }
}

impl ReachabilityProber for MockReachabilityProber {
    fn probe(
        &self,
        _address: &str,
        context: Option<&str>,
    ) -> Result<Reachability, TransportError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock().unwrap() = context.map(str::to_string);
        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.fallback),
        }
    }
}
