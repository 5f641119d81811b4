//! Interface administrative state actuator.
//!
//! Issues the shutdown / no-shutdown transitions. The enable direction
//! must be idempotent: re-enabling an already-enabled interface is a
//! config no-op on every supported vendor, and the orchestrator relies
//! on that for its final restoration step.

use std::sync::Mutex;

use crate::flavor::CliFlavor;
use crate::transport::{CommandRunner, TransportError};

/// Trait for setting the administrative state of an interface.
pub trait InterfaceActuator: Send + Sync {
    /// Enable (`true`) or disable (`false`) `interface`.
    fn set_admin_state(&self, interface: &str, enabled: bool) -> Result<(), TransportError>;
}

/// Actuator that drives the vendor config CLI.
#[derive(Debug)]
pub struct ConfigActuator<R> {
    runner: R,
    flavor: CliFlavor,
}

impl<R: CommandRunner> ConfigActuator<R> {
    pub fn new(runner: R, flavor: CliFlavor) -> Self {
        Self { runner, flavor }
    }
}

impl<R: CommandRunner> InterfaceActuator for ConfigActuator<R> {
    fn set_admin_state(&self, interface: &str, enabled: bool) -> Result<(), TransportError> {
        let command = self.flavor.admin_command(interface, enabled);
        self.runner.run(&command)?;
        Ok(())
    }
}

/// Recording actuator for tests.
///
/// Remembers every transition requested, in order, and can be scripted
/// to fail specific calls.
#[derive(Debug, Default)]
pub struct MockActuator {
    calls: Mutex<Vec<(String, bool)>>,
    script: Mutex<std::collections::VecDeque<Option<TransportError>>>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for the next unscripted call (consumed in order).
    pub fn push_failure(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Some(error));
    }

    /// Queue a success, so a later `push_failure` targets a specific
    /// call.
    pub fn push_ok(&self) {
        self.script.lock().unwrap().push_back(None);
    }

    /// All transitions requested so far as `(interface, enabled)` pairs.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of enable transitions requested.
    pub fn enable_count(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|(_, e)| *e).count()
    }

    /// Number of disable transitions requested.
    pub fn disable_count(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|(_, e)| !e).count()
    }

    /// The most recent transition, if any.
    pub fn last_call(&self) -> Option<(String, bool)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl InterfaceActuator for MockActuator {
    fn set_admin_state(&self, interface: &str, enabled: bool) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((interface.to_string(), enabled));
        match self.script.lock().unwrap().pop_front() {
            Some(Some(error)) => Err(error),
            _ => Ok(()),
        }
    }
}
