//! ifbounce CLI library.
//!
//! Wires CLI parsing, logging, signal handling and the recovery
//! orchestrator together. The binary in `main.rs` only builds the real
//! collaborators and maps the run verdict to an exit code.

pub mod cli;
pub mod exit;
pub mod logger;
pub mod orchestrator;
pub mod report;
pub mod run;
pub mod signal;
pub mod sleeper;

pub use cli::{Cli, CliError};
pub use logger::{Logger, MockLogger, NullLogger, StderrLogger, Verbosity};
pub use orchestrator::{
    CycleOutcome, CycleRecord, Orchestrator, PolicyConfig, RunOutcome, RunState, Target,
};
pub use report::RunSummary;
pub use run::{execute_run, RunReport, RunVerdict};
pub use signal::{AlwaysShutdown, CountdownShutdown, NeverShutdown, ShutdownCheck, ShutdownFlag};
pub use sleeper::{MockSleeper, RealSleeper, Sleeper};
