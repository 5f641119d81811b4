//! Device command transport.
//!
//! Provides the `CommandRunner` trait (execute one command against the
//! device, get raw text back), a subprocess-backed real implementation,
//! and a scripted mock for tests.

use std::collections::VecDeque;
use std::process::Command;
use std::sync::Mutex;

use thiserror::Error;

use crate::flavor::CliFlavor;

/// Errors from the device command channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to launch device CLI '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("device command failed with status {status}: {command}")]
    CommandFailed { command: String, status: i32 },

    #[error("device output for '{command}' was not valid UTF-8")]
    InvalidOutput { command: String },
}

/// Trait for executing a single command against the device.
///
/// Implementations must be safe to call repeatedly with the same command:
/// the orchestrator retries commands inside its bounce and probe budgets.
pub trait CommandRunner: Send + Sync {
    /// Execute `command` and return its raw stdout text.
    fn run(&self, command: &str) -> Result<String, TransportError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &str) -> Result<String, TransportError> {
        (**self).run(command)
    }
}

/// Real transport that shells out to the vendor CLI binary.
///
/// The vendor binary and invocation syntax come from the `CliFlavor`
/// chosen explicitly at startup; there is no runtime discovery of which
/// CLI happens to be present.
#[derive(Debug, Clone, Copy)]
pub struct SubprocessCli {
    flavor: CliFlavor,
}

impl SubprocessCli {
    /// Create a transport for the given vendor flavor.
    pub fn new(flavor: CliFlavor) -> Self {
        Self { flavor }
    }
}

impl CommandRunner for SubprocessCli {
    fn run(&self, command: &str) -> Result<String, TransportError> {
        let program = self.flavor.program();
        let output = Command::new(program)
            .args(self.flavor.program_args())
            .arg(command)
            .output()
            .map_err(|e| TransportError::Spawn {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(TransportError::CommandFailed {
                command: command.to_string(),
                status: output.status.code().unwrap_or(-1),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| TransportError::InvalidOutput {
            command: command.to_string(),
        })
    }
}

/// Scripted transport for tests.
///
/// Returns queued responses in order; once the queue is exhausted it
/// returns the configured fallback. Records every command it was asked
/// to run so tests can assert on command ordering.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    commands: Mutex<Vec<String>>,
    fallback: Option<String>,
}

impl ScriptedRunner {
    /// Create a runner with no scripted responses; every command fails
    /// with a transport error unless a fallback is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner that answers every command with `output`.
    pub fn always(output: &str) -> Self {
        Self {
            fallback: Some(output.to_string()),
            ..Self::default()
        }
    }

    /// Queue a successful response.
    pub fn push_output(&self, output: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(output.to_string()));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Commands executed so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str) -> Result<String, TransportError> {
        self.commands.lock().unwrap().push(command.to_string());
        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return response;
        }
        match &self.fallback {
            Some(output) => Ok(output.clone()),
            None => Err(TransportError::CommandFailed {
                command: command.to_string(),
                status: 1,
            }),
        }
    }
}
