//! Run wiring: validate arguments, drive the orchestrator, and reduce
//! the run state to a verdict the binary can map to an exit code.

use ifbounce_clock::Clock;
use ifbounce_device::{InterfaceActuator, LinkProber, ReachabilityProber, TransportError};

use crate::cli::{Cli, CliError};
use crate::logger::Logger;
use crate::orchestrator::{CycleOutcome, CycleRecord, Orchestrator};
use crate::report::RunSummary;
use crate::signal::ShutdownCheck;
use crate::sleeper::Sleeper;

/// How the run ended, for exit-code purposes.
#[derive(Debug)]
pub enum RunVerdict {
    /// Every completed cycle succeeded.
    Clean,
    /// Cut short by an operator interrupt; restoration succeeded.
    Interrupted,
    /// At least one cycle failed; restoration succeeded.
    RecoveryFailed(CycleOutcome),
    /// The mandatory final enable failed. The interface may be left
    /// administratively down; nothing else matters at this point.
    RestorationFailed(TransportError),
}

/// Result of a full run.
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub cycles: Vec<CycleRecord>,
    pub verdict: RunVerdict,
}

/// Validate arguments and execute the whole run.
#[allow(clippy::too_many_arguments)]
pub fn execute_run<L, P, A, C, S, H, G>(
    cli: &Cli,
    link: &L,
    ping: &P,
    actuator: &A,
    clock: &C,
    sleeper: &S,
    shutdown: &H,
    logger: &G,
) -> Result<RunReport, CliError>
where
    L: LinkProber,
    P: ReachabilityProber,
    A: InterfaceActuator,
    C: Clock,
    S: Sleeper,
    H: ShutdownCheck,
    G: Logger,
{
    cli.validate()?;

    let orchestrator = Orchestrator::new(
        cli.target(),
        cli.policy(),
        link,
        ping,
        actuator,
        clock,
        sleeper,
        shutdown,
        logger,
    );
    let outcome = orchestrator.run();

    let verdict = match outcome.restoration {
        Err(e) => RunVerdict::RestorationFailed(e),
        Ok(()) => match outcome.state.first_failure() {
            Some(failure) => RunVerdict::RecoveryFailed(failure),
            None if outcome.state.was_interrupted() => RunVerdict::Interrupted,
            None => RunVerdict::Clean,
        },
    };

    Ok(RunReport {
        summary: RunSummary::from_state(&outcome.state),
        cycles: outcome.state.cycles,
        verdict,
    })
}
