//! CLI argument parsing and validation.

use clap::Parser;
use thiserror::Error;

use ifbounce_device::CliFlavor;

use crate::orchestrator::{PolicyConfig, Target};

/// Default routing context for the reachability probe.
pub const DEFAULT_ROUTING_CONTEXT: &str = "default";

/// Default bound on waiting for link-up after a bounce, in seconds.
pub const DEFAULT_LINK_UP_TIMEOUT_SEC: u64 = 60;

/// Default link-up polling cadence in seconds.
pub const DEFAULT_POLL_INTERVAL_SEC: u64 = 5;

/// Default reachability probe budget per cycle.
pub const DEFAULT_MAX_PING_ATTEMPTS: u32 = 3;

/// Default delay between failed probes in seconds.
pub const DEFAULT_PING_BACKOFF_SEC: u64 = 5;

/// Default re-bounce budget per cycle.
pub const DEFAULT_MAX_BOUNCE_ATTEMPTS: u32 = 3;

/// Default delay between cycles in seconds. NX-OS flags a port after
/// 5 flaps in 10 seconds, so this should stay nonzero on real devices.
pub const DEFAULT_CYCLE_DELAY_SEC: u64 = 5;

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("poll-interval must be at least 1 second, got {0}")]
    InvalidPollInterval(u64),

    #[error("link-up-timeout must be at least 1 second, got {0}")]
    InvalidLinkUpTimeout(u64),

    #[error("max-ping-attempts must be at least 1, got {0}")]
    InvalidPingAttempts(u32),

    #[error("max-bounce-attempts must be at least 1, got {0}")]
    InvalidBounceAttempts(u32),

    #[error("interface name must not be empty")]
    EmptyInterface,

    #[error("target address must not be empty")]
    EmptyAddress,
}

/// Bounce a network interface and verify it recovers cleanly.
///
/// Repeatedly shuts and re-enables INTERFACE, waits for it to come
/// operationally up, then verifies reachability of TARGET_ADDRESS.
/// The interface is always re-enabled on exit, however the run ends.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ifbounce")]
#[command(version, about)]
pub struct Cli {
    /// Interface to bounce (e.g. Ethernet1/1).
    pub interface: String,

    /// Address to ping after each bounce.
    pub target_address: String,

    /// Routing context (VRF) for the ping.
    #[arg(default_value = DEFAULT_ROUTING_CONTEXT)]
    pub routing_context: String,

    /// Seconds to wait for link-up after a bounce.
    #[arg(long, default_value_t = DEFAULT_LINK_UP_TIMEOUT_SEC)]
    pub link_up_timeout: u64,

    /// Seconds between link-up polls.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SEC)]
    pub poll_interval: u64,

    /// Reachability probes per cycle before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_PING_ATTEMPTS)]
    pub max_ping_attempts: u32,

    /// Seconds between failed reachability probes.
    #[arg(long, default_value_t = DEFAULT_PING_BACKOFF_SEC)]
    pub ping_backoff: u64,

    /// Bounce attempts per cycle before declaring the link dead.
    #[arg(long, default_value_t = DEFAULT_MAX_BOUNCE_ATTEMPTS)]
    pub max_bounce_attempts: u32,

    /// Seconds to wait between cycles (keep nonzero to stay clear of
    /// the device's port-flap detection).
    #[arg(long, default_value_t = DEFAULT_CYCLE_DELAY_SEC)]
    pub cycle_delay: u64,

    /// Number of cycles to run; 0 runs until interrupted.
    #[arg(long, default_value_t = 0)]
    pub max_cycles: u64,

    /// Keep cycling after a failed cycle instead of stopping.
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Vendor CLI syntax to use: nexus or eos.
    #[arg(long, default_value_t = CliFlavor::Nexus)]
    pub cli_flavor: CliFlavor,

    /// Increase verbosity (-v progress detail, -vv raw device output).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validate argument values beyond what clap enforces.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.interface.trim().is_empty() {
            return Err(CliError::EmptyInterface);
        }
        if self.target_address.trim().is_empty() {
            return Err(CliError::EmptyAddress);
        }
        if self.link_up_timeout == 0 {
            return Err(CliError::InvalidLinkUpTimeout(self.link_up_timeout));
        }
        if self.poll_interval == 0 {
            return Err(CliError::InvalidPollInterval(self.poll_interval));
        }
        if self.max_ping_attempts == 0 {
            return Err(CliError::InvalidPingAttempts(self.max_ping_attempts));
        }
        if self.max_bounce_attempts == 0 {
            return Err(CliError::InvalidBounceAttempts(self.max_bounce_attempts));
        }
        Ok(())
    }

    /// The run target described by the positional arguments.
    pub fn target(&self) -> Target {
        Target {
            interface: self.interface.clone(),
            address: self.target_address.clone(),
            context: Some(self.routing_context.clone()),
        }
    }

    /// The timing/retry policy described by the flags.
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            link_up_timeout_sec: self.link_up_timeout,
            link_up_poll_interval_sec: self.poll_interval,
            max_ping_attempts: self.max_ping_attempts,
            ping_retry_backoff_sec: self.ping_backoff,
            max_bounce_attempts_per_cycle: self.max_bounce_attempts,
            cycle_delay_sec: self.cycle_delay,
            max_cycles: self.max_cycles,
            stop_on_failure: !self.continue_on_failure,
        }
    }
}
