//! Link state probing.
//!
//! Determines whether an interface is operationally up by issuing a
//! status show command and parsing the vendor output. Parsing stays in
//! here; the orchestrator only ever sees the `LinkState` tri-state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::flavor::CliFlavor;
use crate::transport::{CommandRunner, TransportError};

/// Operational state of an interface as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Line protocol is up / status column reports up or connected.
    Up,
    /// Administratively or operationally down.
    Down,
    /// Output did not mention the interface or had an unrecognized status.
    Unknown,
}

/// Trait for checking the operational state of an interface.
pub trait LinkProber: Send + Sync {
    /// Query the device for the current state of `interface`.
    fn link_state(&self, interface: &str) -> Result<LinkState, TransportError>;
}

/// Prober that issues a `show interface ... status` command and parses
/// the reply.
#[derive(Debug)]
pub struct ShowInterfaceProber<R> {
    runner: R,
    flavor: CliFlavor,
}

impl<R: CommandRunner> ShowInterfaceProber<R> {
    pub fn new(runner: R, flavor: CliFlavor) -> Self {
        Self { runner, flavor }
    }
}

impl<R: CommandRunner> LinkProber for ShowInterfaceProber<R> {
    fn link_state(&self, interface: &str) -> Result<LinkState, TransportError> {
        let command = self.flavor.status_command(interface);
        let output = self.runner.run(&command)?;
        Ok(parse_status_output(&output, interface))
    }
}

/// Parse vendor status output into a `LinkState`.
///
/// Handles the two shapes seen in the field: prose "line protocol is
/// up/down" lines, and the status table where the row for the interface
/// carries an up/connected or down/notconnect column.
fn parse_status_output(output: &str, interface: &str) -> LinkState {
    if output.contains("line protocol is up") {
        return LinkState::Up;
    }
    if output.contains("line protocol is down") {
        return LinkState::Down;
    }

    for line in output.lines() {
        let mut fields = line.split_whitespace();
        // Exact match on the Port column; prefix matching would let
        // Eth1/1 claim the Eth1/10 row.
        if fields.next() != Some(interface) {
            continue;
        }
        // The status is the first recognized keyword after the Port
        // column. The Name column renders as `--` when empty and a
        // multi-word description never collides with the keyword set
        // unless a word of it is itself a bare status word.
        for field in fields {
            match field.to_ascii_lowercase().as_str() {
                "up" | "connected" => return LinkState::Up,
                "down" | "notconnect" | "notconnec" | "disabled" | "errdisabled"
                | "err-disabled" | "sfpabsent" | "xcvrabsen" => return LinkState::Down,
                _ => continue,
            }
        }
    }
    LinkState::Unknown
}

/// Scripted link prober for tests.
///
/// Plays back a queue of states/errors, then settles on a fallback
/// state. Counts how many times it was polled.
#[derive(Debug)]
pub struct MockLinkProber {
    script: Mutex<VecDeque<Result<LinkState, TransportError>>>,
    fallback: LinkState,
    polls: AtomicUsize,
}

impl MockLinkProber {
    /// Prober that reports `fallback` once any scripted states run out.
    pub fn new(fallback: LinkState) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            polls: AtomicUsize::new(0),
        }
    }

    /// Prober that always reports the link up.
    pub fn always_up() -> Self {
        Self::new(LinkState::Up)
    }

    /// Prober that never reports the link up.
    pub fn never_up() -> Self {
        Self::new(LinkState::Down)
    }

    /// Queue a state to report before falling back.
    pub fn push_state(&self, state: LinkState) {
        self.script.lock().unwrap().push_back(Ok(state));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of times the prober was polled.
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl LinkProber for MockLinkProber {
    fn link_state(&self, _interface: &str) -> Result<LinkState, TransportError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.fallback),
        }
    }
}
