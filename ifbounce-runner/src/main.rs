//! ifbounce binary.
//!
//! Builds the real device collaborators from the parsed arguments,
//! runs the recovery loop, prints the summary, and maps the verdict to
//! an exit code.

use std::process::ExitCode;

use chrono::{TimeZone, Utc};
use clap::Parser;

use ifbounce_clock::SystemClock;
use ifbounce_device::{ConfigActuator, PingProber, ShowInterfaceProber, SubprocessCli};
use ifbounce_runner::exit::{codes, exit_code};
use ifbounce_runner::{
    execute_run, Cli, RealSleeper, RunVerdict, ShutdownFlag, StderrLogger, Verbosity,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = StderrLogger::new(Verbosity::from_count(cli.verbose));
    let shutdown = ShutdownFlag::new();

    let transport = SubprocessCli::new(cli.cli_flavor);
    let link = ShowInterfaceProber::new(transport, cli.cli_flavor);
    let ping = PingProber::new(transport, cli.cli_flavor);
    let actuator = ConfigActuator::new(transport, cli.cli_flavor);

    let clock = SystemClock;
    let sleeper = RealSleeper::new();

    let report = match execute_run(
        &cli, &link, &ping, &actuator, &clock, &sleeper, &shutdown, &logger,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(codes::RECOVERY_FAILED as u8);
        }
    };

    println!("{}", report.summary);
    println!("  Started at:        {}", format_ts(report.summary.started_at));

    match &report.verdict {
        RunVerdict::Clean => {}
        RunVerdict::Interrupted => println!("Run interrupted; interface restored."),
        RunVerdict::RecoveryFailed(outcome) => {
            eprintln!("error: recovery failed ({:?}); interface restored", outcome)
        }
        RunVerdict::RestorationFailed(e) => {
            eprintln!(
                "error: could not restore {}: {} -- check the interface by hand",
                cli.interface, e
            )
        }
    }

    ExitCode::from(exit_code(&report.verdict) as u8)
}

/// Render a Unix timestamp as UTC for the summary footer.
fn format_ts(ts_unix: u64) -> String {
    Utc.timestamp_opt(ts_unix as i64, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts_unix.to_string())
}
