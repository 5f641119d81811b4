//! Recovery orchestrator.
//!
//! Owns the bounce / link-wait / reachability-verify state machine, all
//! timing and retry policy, per-cycle records, and the restoration
//! safety net. Performs no device I/O itself: the device is reached
//! only through the injected prober and actuator traits, and every wait
//! goes through the injected `Sleeper` with cancellation checked
//! between slices.
//!
//! State flow per cycle:
//! `Bouncing -> AwaitingLinkUp -> VerifyingReachability -> outcome`,
//! with a bounded re-bounce loop on link-up timeout. Each state is a
//! method; there is no separate state value because the call structure
//! is the machine.

use std::time::Duration;

use ifbounce_clock::Clock;
use ifbounce_device::{
    InterfaceActuator, LinkProber, LinkState, Reachability, ReachabilityProber, TransportError,
};

use crate::logger::Logger;
use crate::signal::ShutdownCheck;
use crate::sleeper::Sleeper;

/// Cancellation latency bound: waits are sliced this finely so an
/// interrupt never lingers for a whole poll interval.
const WAIT_SLICE: Duration = Duration::from_millis(200);

/// Terminal outcome of one bounce-verify cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Link recovered and the target answered a probe.
    Success,
    /// Link never reached operational-up within the bounce budget.
    LinkNeverUp,
    /// Link came up but every reachability probe failed.
    ReachabilityExhausted,
    /// Cancelled mid-cycle by an external interrupt.
    Aborted,
}

/// Record of one full bounce-verify cycle. Closed (never mutated again)
/// once its outcome is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRecord {
    /// 1-based, unique and monotonically increasing within a run.
    pub cycle_number: u64,
    /// Unix seconds at cycle start.
    pub started_at: u64,
    /// Unix seconds at cycle end; `>= started_at`.
    pub ended_at: u64,
    /// Bounce + link-wait sub-attempts performed; always >= 1.
    pub bounce_attempts: u32,
    /// Reachability probes issued this cycle.
    pub ping_attempts: u32,
    pub outcome: CycleOutcome,
}

/// What the run is pointed at; fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub interface: String,
    pub address: String,
    /// Routing context (VRF) scoping the reachability probe.
    pub context: Option<String>,
}

/// Timing and retry policy for one run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Bound on waiting for operational link-up after a bounce.
    pub link_up_timeout_sec: u64,
    /// Link-up polling cadence; at least 1s, never busy-spins.
    pub link_up_poll_interval_sec: u64,
    /// Reachability probe budget per cycle.
    pub max_ping_attempts: u32,
    /// Fixed delay between failed probes. Constant by choice: probe
    /// latency is already bounded by the probe's own timeout, so an
    /// increasing backoff buys nothing here.
    pub ping_retry_backoff_sec: u64,
    /// Re-bounce budget per cycle before declaring the link dead.
    pub max_bounce_attempts_per_cycle: u32,
    /// Delay between cycles. Keep nonzero on real devices: NX-OS flags
    /// a port after 5 flaps in 10 seconds, and back-to-back bounces of
    /// a healthy fast link would trip exactly that.
    pub cycle_delay_sec: u64,
    /// Cycle budget for the run; 0 means run until stopped.
    pub max_cycles: u64,
    /// Stop the run after the first failed cycle.
    pub stop_on_failure: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            link_up_timeout_sec: 60,
            link_up_poll_interval_sec: 5,
            max_ping_attempts: 3,
            ping_retry_backoff_sec: 5,
            max_bounce_attempts_per_cycle: 3,
            cycle_delay_sec: 5,
            max_cycles: 0,
            stop_on_failure: true,
        }
    }
}

/// Run-wide state, owned and mutated exclusively by the orchestrator.
#[derive(Debug, Clone)]
pub struct RunState {
    pub target: Target,
    /// Unix seconds at run start.
    pub started_at: u64,
    /// Closed cycle records, in execution order.
    pub cycles: Vec<CycleRecord>,
    /// True once the safety net has guaranteed the interface is enabled.
    pub interface_administratively_restored: bool,
}

impl RunState {
    fn new(target: Target, started_at: u64) -> Self {
        Self {
            target,
            started_at,
            cycles: Vec::new(),
            interface_administratively_restored: false,
        }
    }

    /// Cycles that ended in `Success`.
    pub fn successful_cycles(&self) -> usize {
        self.cycles
            .iter()
            .filter(|c| c.outcome == CycleOutcome::Success)
            .count()
    }

    /// The first non-success, non-abort outcome, if any.
    pub fn first_failure(&self) -> Option<CycleOutcome> {
        self.cycles.iter().map(|c| c.outcome).find(|o| {
            matches!(
                o,
                CycleOutcome::LinkNeverUp | CycleOutcome::ReachabilityExhausted
            )
        })
    }

    /// True if the run was cut short by an interrupt.
    pub fn was_interrupted(&self) -> bool {
        self.cycles
            .iter()
            .any(|c| c.outcome == CycleOutcome::Aborted)
    }
}

/// Everything the run produced, including whether the safety net held.
#[derive(Debug)]
pub struct RunOutcome {
    pub state: RunState,
    /// `Err` means the mandatory final enable itself failed: the one
    /// condition the tool cannot recover from.
    pub restoration: Result<(), TransportError>,
}

/// How a link-up wait ended.
enum LinkWait {
    Up,
    TimedOut,
    Cancelled,
}

/// How a verification phase ended.
enum Verify {
    Reachable,
    Exhausted,
    Cancelled,
}

/// The recovery orchestrator. Consumes its collaborators purely through
/// traits; see the module docs for the state flow.
pub struct Orchestrator<'a, L, P, A, C, S, H, G>
where
    L: LinkProber,
    P: ReachabilityProber,
    A: InterfaceActuator,
    C: Clock,
    S: Sleeper,
    H: ShutdownCheck,
    G: Logger,
{
    link: &'a L,
    ping: &'a P,
    actuator: &'a A,
    clock: &'a C,
    sleeper: &'a S,
    shutdown: &'a H,
    logger: &'a G,
    policy: PolicyConfig,
    state: RunState,
}

impl<'a, L, P, A, C, S, H, G> Orchestrator<'a, L, P, A, C, S, H, G>
where
    L: LinkProber,
    P: ReachabilityProber,
    A: InterfaceActuator,
    C: Clock,
    S: Sleeper,
    H: ShutdownCheck,
    G: Logger,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        target: Target,
        policy: PolicyConfig,
        link: &'a L,
        ping: &'a P,
        actuator: &'a A,
        clock: &'a C,
        sleeper: &'a S,
        shutdown: &'a H,
        logger: &'a G,
    ) -> Self {
        let started_at = clock.now_unix_sec();
        Self {
            link,
            ping,
            actuator,
            clock,
            sleeper,
            shutdown,
            logger,
            policy,
            state: RunState::new(target, started_at),
        }
    }

    /// Run cycles until the policy or an interrupt stops us, then fire
    /// the restoration safety net.
    ///
    /// Consuming `self` makes double-running (and with it a second
    /// restoration) unrepresentable: there is exactly one exit point
    /// and the safety net sits on it.
    pub fn run(mut self) -> RunOutcome {
        self.logger.info(&format!(
            "Bouncing {} and verifying reachability of {}{}",
            self.state.target.interface,
            self.state.target.address,
            match &self.state.target.context {
                Some(ctx) => format!(" (vrf {})", ctx),
                None => String::new(),
            }
        ));

        let mut cycle_number: u64 = 0;
        loop {
            if self.shutdown.should_stop() {
                self.logger.info("Interrupted; stopping before next cycle");
                break;
            }
            if self.policy.max_cycles > 0 && cycle_number >= self.policy.max_cycles {
                self.logger
                    .verbose(&format!("Cycle budget of {} reached", self.policy.max_cycles));
                break;
            }

            cycle_number += 1;
            let record = self.run_cycle(cycle_number);
            let stop = match record.outcome {
                CycleOutcome::Success => false,
                CycleOutcome::Aborted => true,
                CycleOutcome::LinkNeverUp | CycleOutcome::ReachabilityExhausted => {
                    self.policy.stop_on_failure
                }
            };
            self.state.cycles.push(record);
            if stop {
                break;
            }
            if self.policy.max_cycles > 0 && cycle_number >= self.policy.max_cycles {
                // Budget spent; no point waiting out a delay first. The
                // loop top logs and breaks.
                continue;
            }
            if !self.pause(self.policy.cycle_delay_sec) {
                self.logger.info("Interrupted during cycle delay");
                break;
            }
        }

        let restoration = self.restore();
        RunOutcome {
            state: self.state,
            restoration,
        }
    }

    /// One full cycle: bounce, wait for link-up (re-bouncing within
    /// budget), then verify reachability.
    fn run_cycle(&mut self, cycle_number: u64) -> CycleRecord {
        let started_at = self.clock.now_unix_sec();
        let mut record = CycleRecord {
            cycle_number,
            started_at,
            ended_at: started_at,
            bounce_attempts: 0,
            ping_attempts: 0,
            outcome: CycleOutcome::Aborted,
        };
        self.logger.info(&format!("== Cycle {} ==", cycle_number));

        loop {
            record.bounce_attempts += 1;
            self.logger.verbose(&format!(
                "Flap attempt {}/{}",
                record.bounce_attempts, self.policy.max_bounce_attempts_per_cycle
            ));

            match self.bounce() {
                Ok(()) => match self.await_link_up() {
                    LinkWait::Up => {
                        let outcome = match self.verify_reachability(&mut record.ping_attempts) {
                            Verify::Reachable => CycleOutcome::Success,
                            Verify::Exhausted => CycleOutcome::ReachabilityExhausted,
                            Verify::Cancelled => CycleOutcome::Aborted,
                        };
                        return self.close(record, outcome);
                    }
                    LinkWait::TimedOut => {
                        self.logger.info(&format!(
                            "{} not up after {}s",
                            self.state.target.interface, self.policy.link_up_timeout_sec
                        ));
                    }
                    LinkWait::Cancelled => return self.close(record, CycleOutcome::Aborted),
                },
                Err(e) => {
                    // Burns the attempt; a failed shutdown or no-shutdown
                    // is not retried within the same bounce.
                    self.logger.info(&format!(
                        "Bounce attempt {} failed: {}",
                        record.bounce_attempts, e
                    ));
                }
            }

            if record.bounce_attempts >= self.policy.max_bounce_attempts_per_cycle {
                return self.close(record, CycleOutcome::LinkNeverUp);
            }
            if self.shutdown.should_stop() {
                return self.close(record, CycleOutcome::Aborted);
            }
        }
    }

    /// Close a record with its outcome and log it.
    fn close(&self, mut record: CycleRecord, outcome: CycleOutcome) -> CycleRecord {
        record.outcome = outcome;
        record.ended_at = self.clock.now_unix_sec().max(record.started_at);
        self.logger.info(&format!(
            "Cycle {} finished: {:?} (bounces: {}, pings: {})",
            record.cycle_number, record.outcome, record.bounce_attempts, record.ping_attempts
        ));
        record
    }

    /// Admin down, then admin up. Either sub-step failing fails the
    /// whole attempt.
    fn bounce(&self) -> Result<(), TransportError> {
        let interface = &self.state.target.interface;
        self.actuator.set_admin_state(interface, false)?;
        self.logger.verbose(&format!("{} shut down", interface));
        self.actuator.set_admin_state(interface, true)?;
        self.logger.verbose(&format!("{} re-enabled", interface));
        Ok(())
    }

    /// Poll the link prober at the configured cadence until it reports
    /// up or the timeout elapses. Transport errors and Down/Unknown
    /// readings just keep us polling; the deadline is the only judge.
    fn await_link_up(&self) -> LinkWait {
        let interface = &self.state.target.interface;
        let deadline = self.clock.now_unix_sec() + self.policy.link_up_timeout_sec;

        loop {
            if self.shutdown.should_stop() {
                return LinkWait::Cancelled;
            }
            match self.link.link_state(interface) {
                Ok(LinkState::Up) => {
                    self.logger.info(&format!("{} is up", interface));
                    return LinkWait::Up;
                }
                Ok(state) => {
                    self.logger
                        .verbose(&format!("{} not up yet ({:?})", interface, state));
                }
                Err(e) => {
                    self.logger
                        .verbose(&format!("Link state check failed: {}", e));
                }
            }
            if self.clock.now_unix_sec() >= deadline {
                return LinkWait::TimedOut;
            }
            if !self.pause(self.policy.link_up_poll_interval_sec) {
                return LinkWait::Cancelled;
            }
        }
    }

    /// Probe reachability up to the attempt budget, backing off between
    /// failures. The first success short-circuits the remaining budget.
    /// A transport error counts as a failed attempt.
    fn verify_reachability(&self, attempts: &mut u32) -> Verify {
        let target = &self.state.target;
        for attempt in 1..=self.policy.max_ping_attempts {
            if self.shutdown.should_stop() {
                return Verify::Cancelled;
            }
            *attempts = attempt;
            match self.ping.probe(&target.address, target.context.as_deref()) {
                Ok(Reachability::Reachable) => {
                    self.logger
                        .info(&format!("{} reachable (probe {})", target.address, attempt));
                    return Verify::Reachable;
                }
                Ok(Reachability::Unreachable) => {
                    self.logger.info(&format!(
                        "{} unreachable (probe {}/{})",
                        target.address, attempt, self.policy.max_ping_attempts
                    ));
                }
                Err(e) => {
                    self.logger
                        .info(&format!("Probe {} failed: {}", attempt, e));
                }
            }
            if attempt < self.policy.max_ping_attempts
                && !self.pause(self.policy.ping_retry_backoff_sec)
            {
                return Verify::Cancelled;
            }
        }
        Verify::Exhausted
    }

    /// The safety net: one final enable, on every exit path.
    ///
    /// Runs even if no bounce was ever issued; re-enabling an enabled
    /// interface is idempotent on the device side.
    fn restore(&mut self) -> Result<(), TransportError> {
        let interface = self.state.target.interface.clone();
        self.logger
            .info(&format!("Ensuring {} is administratively enabled", interface));
        match self.actuator.set_admin_state(&interface, true) {
            Ok(()) => {
                self.state.interface_administratively_restored = true;
                Ok(())
            }
            Err(e) => {
                self.logger.info(&format!(
                    "FAILED to restore {}: {} -- interface may be left shut down",
                    interface, e
                ));
                Err(e)
            }
        }
    }

    /// Sliced, cancellable wait. Returns false if an interrupt became
    /// visible during the wait.
    fn pause(&self, seconds: u64) -> bool {
        let mut remaining = Duration::from_secs(seconds);
        while !remaining.is_zero() {
            if self.shutdown.should_stop() {
                return false;
            }
            let slice = remaining.min(WAIT_SLICE);
            self.sleeper.sleep(slice);
            remaining -= slice;
        }
        !self.shutdown.should_stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MockLogger;
    use crate::signal::{CountdownShutdown, NeverShutdown, ShutdownFlag};
    use crate::sleeper::MockSleeper;
    use ifbounce_clock::AdvancingClock;
    use ifbounce_device::{MockActuator, MockLinkProber, MockReachabilityProber};

    fn target() -> Target {
        Target {
            interface: "Eth1/1".to_string(),
            address: "10.1.1.1".to_string(),
            context: Some("default".to_string()),
        }
    }

    fn single_cycle_policy() -> PolicyConfig {
        PolicyConfig {
            max_cycles: 1,
            ..PolicyConfig::default()
        }
    }

    struct Harness {
        link: MockLinkProber,
        ping: MockReachabilityProber,
        actuator: MockActuator,
        clock: AdvancingClock,
        sleeper: MockSleeper,
        logger: MockLogger,
    }

    impl Harness {
        fn new(link: MockLinkProber, ping: MockReachabilityProber) -> Self {
            Self {
                link,
                ping,
                actuator: MockActuator::new(),
                clock: AdvancingClock::new(1000, 1),
                sleeper: MockSleeper::new(),
                logger: MockLogger::new(),
            }
        }

        fn run<H: ShutdownCheck>(&self, policy: PolicyConfig, shutdown: &H) -> RunOutcome {
            Orchestrator::new(
                target(),
                policy,
                &self.link,
                &self.ping,
                &self.actuator,
                &self.clock,
                &self.sleeper,
                shutdown,
                &self.logger,
            )
            .run()
        }
    }

    // Scenario A: link up within two polls, first probe succeeds.
    #[test]
    fn test_clean_recovery_in_one_cycle() {
        let link = MockLinkProber::always_up();
        link.push_state(LinkState::Down);
        let h = Harness::new(link, MockReachabilityProber::always_reachable());

        let outcome = h.run(single_cycle_policy(), &NeverShutdown);

        assert_eq!(outcome.state.cycles.len(), 1);
        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::Success);
        assert_eq!(cycle.bounce_attempts, 1);
        assert_eq!(cycle.ping_attempts, 1);
        assert_eq!(cycle.cycle_number, 1);
        assert!(cycle.ended_at >= cycle.started_at);
        assert!(outcome.state.interface_administratively_restored);
        assert!(outcome.restoration.is_ok());
        // down, up (bounce), final enable
        assert_eq!(h.actuator.calls().len(), 3);
        assert_eq!(h.actuator.last_call(), Some(("Eth1/1".to_string(), true)));
    }

    // Scenario B: link never up, 10s timeout at 2s cadence = 5 polls.
    #[test]
    fn test_link_never_up_polls_to_the_deadline() {
        let h = Harness {
            clock: AdvancingClock::new(0, 2),
            ..Harness::new(MockLinkProber::never_up(), MockReachabilityProber::always_reachable())
        };
        let policy = PolicyConfig {
            link_up_timeout_sec: 10,
            link_up_poll_interval_sec: 2,
            max_bounce_attempts_per_cycle: 1,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::LinkNeverUp);
        assert_eq!(cycle.bounce_attempts, 1);
        assert_eq!(cycle.ping_attempts, 0);
        assert_eq!(h.link.polls(), 5);
        assert_eq!(h.ping.probes(), 0);
        // Restoration still ran.
        assert!(outcome.state.interface_administratively_restored);
        assert_eq!(h.actuator.last_call(), Some(("Eth1/1".to_string(), true)));
    }

    // Scenario C: link up immediately, all three probes fail.
    #[test]
    fn test_reachability_exhausted_after_three_probes() {
        let h = Harness::new(
            MockLinkProber::always_up(),
            MockReachabilityProber::never_reachable(),
        );
        let policy = PolicyConfig {
            max_ping_attempts: 3,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::ReachabilityExhausted);
        assert_eq!(cycle.ping_attempts, 3);
        assert_eq!(h.ping.probes(), 3);
        assert!(outcome.state.interface_administratively_restored);
    }

    // Scenario D: interrupt delivered during the link-up poll wait.
    #[test]
    fn test_cancellation_mid_poll_aborts_and_restores_once() {
        let h = Harness::new(MockLinkProber::never_up(), MockReachabilityProber::always_reachable());
        // Let the pre-cycle check and the first few wait-slice checks
        // pass, then trip inside the first poll wait.
        let shutdown = CountdownShutdown::after(6);

        let outcome = h.run(PolicyConfig::default(), &shutdown);

        assert_eq!(outcome.state.cycles.len(), 1);
        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::Aborted);
        assert!(cycle.bounce_attempts >= 1);
        assert!(outcome.state.was_interrupted());
        assert!(outcome.state.interface_administratively_restored);
        assert!(outcome.restoration.is_ok());
        // No probe was ever issued after cancellation.
        assert_eq!(h.ping.probes(), 0);
        // Exactly one enable beyond the bounce's own.
        assert_eq!(h.actuator.enable_count(), 2);
    }

    #[test]
    fn test_interrupt_before_first_cycle_still_restores() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        let shutdown = ShutdownFlag::manual();
        shutdown.trigger();

        let outcome = h.run(PolicyConfig::default(), &shutdown);

        assert!(outcome.state.cycles.is_empty());
        assert!(outcome.state.interface_administratively_restored);
        assert_eq!(h.actuator.calls(), vec![("Eth1/1".to_string(), true)]);
        assert_eq!(h.link.polls(), 0);
    }

    #[test]
    fn test_first_successful_probe_short_circuits_budget() {
        let ping = MockReachabilityProber::always_reachable();
        ping.push_result(Reachability::Unreachable);
        let h = Harness::new(MockLinkProber::always_up(), ping);
        let policy = PolicyConfig {
            max_ping_attempts: 5,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::Success);
        assert_eq!(cycle.ping_attempts, 2);
        assert_eq!(h.ping.probes(), 2);
    }

    #[test]
    fn test_probe_transport_error_counts_as_failed_attempt() {
        let ping = MockReachabilityProber::never_reachable();
        ping.push_error(TransportError::CommandFailed {
            command: "ping".to_string(),
            status: 1,
        });
        let h = Harness::new(MockLinkProber::always_up(), ping);
        let policy = PolicyConfig {
            max_ping_attempts: 2,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::ReachabilityExhausted);
        assert_eq!(cycle.ping_attempts, 2);
    }

    #[test]
    fn test_link_timeout_rebounces_within_budget() {
        let link = MockLinkProber::always_up();
        // First wait times out (three Down readings fill the 9s budget
        // at 3s cadence); the link only comes up on the second bounce.
        for _ in 0..3 {
            link.push_state(LinkState::Down);
        }
        let h = Harness {
            clock: AdvancingClock::new(0, 3),
            ..Harness::new(link, MockReachabilityProber::always_reachable())
        };
        let policy = PolicyConfig {
            link_up_timeout_sec: 9,
            link_up_poll_interval_sec: 3,
            max_bounce_attempts_per_cycle: 3,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::Success);
        assert!(cycle.bounce_attempts >= 2);
        assert!(cycle.bounce_attempts <= 3);
        // Two bounces = four admin transitions, plus the final enable.
        assert_eq!(h.actuator.calls().len() % 2, 1);
    }

    #[test]
    fn test_bounce_transport_failure_burns_attempt_then_link_never_up() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        // Every admin transition fails.
        for _ in 0..10 {
            h.actuator.push_failure(TransportError::CommandFailed {
                command: "conf".to_string(),
                status: 1,
            });
        }
        let policy = PolicyConfig {
            max_bounce_attempts_per_cycle: 2,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        let cycle = &outcome.state.cycles[0];
        assert_eq!(cycle.outcome, CycleOutcome::LinkNeverUp);
        assert_eq!(cycle.bounce_attempts, 2);
        assert_eq!(h.link.polls(), 0);
        // Restoration was still attempted even though its transport is
        // also failing; the failure is surfaced, not swallowed.
        assert!(outcome.restoration.is_err());
        assert!(!outcome.state.interface_administratively_restored);
    }

    #[test]
    fn test_stop_on_failure_ends_run_after_failed_cycle() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::never_reachable());
        let policy = PolicyConfig {
            max_ping_attempts: 1,
            max_cycles: 10,
            stop_on_failure: true,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        assert_eq!(outcome.state.cycles.len(), 1);
        assert_eq!(
            outcome.state.first_failure(),
            Some(CycleOutcome::ReachabilityExhausted)
        );
    }

    #[test]
    fn test_continue_on_failure_runs_all_cycles() {
        let ping = MockReachabilityProber::always_reachable();
        ping.push_result(Reachability::Unreachable); // cycle 1, probe 1 fails
        let h = Harness::new(MockLinkProber::always_up(), ping);
        let policy = PolicyConfig {
            max_ping_attempts: 1,
            max_cycles: 3,
            stop_on_failure: false,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        assert_eq!(outcome.state.cycles.len(), 3);
        assert_eq!(outcome.state.successful_cycles(), 2);
        let numbers: Vec<u64> = outcome.state.cycles.iter().map(|c| c.cycle_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_max_cycles_bounds_the_run() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        let policy = PolicyConfig {
            max_cycles: 4,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        assert_eq!(outcome.state.cycles.len(), 4);
        assert_eq!(outcome.state.successful_cycles(), 4);
    }

    #[test]
    fn test_bounce_attempts_stay_within_budget_across_runs() {
        for budget in 1..=3 {
            let h = Harness {
                clock: AdvancingClock::new(0, 5),
                ..Harness::new(MockLinkProber::never_up(), MockReachabilityProber::always_reachable())
            };
            let policy = PolicyConfig {
                link_up_timeout_sec: 10,
                link_up_poll_interval_sec: 5,
                max_bounce_attempts_per_cycle: budget,
                max_cycles: 1,
                ..PolicyConfig::default()
            };

            let outcome = h.run(policy, &NeverShutdown);
            let cycle = &outcome.state.cycles[0];
            assert!(cycle.bounce_attempts >= 1);
            assert_eq!(cycle.bounce_attempts, budget);
        }
    }

    #[test]
    fn test_restoration_runs_exactly_once_per_run() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        let policy = PolicyConfig {
            max_cycles: 2,
            ..PolicyConfig::default()
        };

        let outcome = h.run(policy, &NeverShutdown);

        // 2 cycles x (down + up) + exactly one restoration enable.
        assert_eq!(h.actuator.calls().len(), 5);
        assert_eq!(h.actuator.disable_count(), 2);
        assert_eq!(h.actuator.enable_count(), 3);
        assert!(outcome.state.interface_administratively_restored);
    }

    #[test]
    fn test_backoff_waits_between_failed_probes_but_not_after_last() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::never_reachable());
        let policy = PolicyConfig {
            link_up_poll_interval_sec: 1,
            max_ping_attempts: 3,
            ping_retry_backoff_sec: 4,
            max_cycles: 1,
            ..PolicyConfig::default()
        };

        h.run(policy, &NeverShutdown);

        // Two backoffs (between probes 1-2 and 2-3), none after probe 3.
        let slept = h.sleeper.total_slept();
        assert_eq!(slept, Duration::from_secs(8));
    }

    #[test]
    fn test_healthy_cycles_are_spaced_by_the_cycle_delay() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        let policy = PolicyConfig {
            cycle_delay_sec: 4,
            max_cycles: 3,
            ..PolicyConfig::default()
        };

        h.run(policy, &NeverShutdown);

        // Three flaps were issued, with a delay between consecutive
        // cycles and none after the last. Link-up and probe both hit on
        // the first try, so the inter-cycle delay is the only wait.
        assert_eq!(h.actuator.disable_count(), 3);
        assert_eq!(h.sleeper.total_slept(), Duration::from_secs(8));
    }

    #[test]
    fn test_cancellation_during_cycle_delay_ends_run_and_restores() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        // Cycle 1 completes (checks: run loop, link wait, verify), then
        // the interrupt lands inside the inter-cycle delay.
        let shutdown = CountdownShutdown::after(5);

        let outcome = h.run(PolicyConfig::default(), &shutdown);

        assert_eq!(outcome.state.cycles.len(), 1);
        assert_eq!(outcome.state.cycles[0].outcome, CycleOutcome::Success);
        assert!(outcome.state.interface_administratively_restored);
        assert_eq!(h.actuator.disable_count(), 1);
        assert_eq!(h.actuator.enable_count(), 2);
    }

    #[test]
    fn test_run_banner_and_cycle_lines_are_logged() {
        let h = Harness::new(MockLinkProber::always_up(), MockReachabilityProber::always_reachable());
        h.run(single_cycle_policy(), &NeverShutdown);

        assert!(h.logger.contains("Bouncing Eth1/1"));
        assert!(h.logger.contains("== Cycle 1 =="));
        assert!(h.logger.contains("administratively enabled"));
    }

    #[test]
    fn test_policy_defaults_are_documented_values() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.link_up_timeout_sec, 60);
        assert_eq!(policy.link_up_poll_interval_sec, 5);
        assert_eq!(policy.max_ping_attempts, 3);
        assert_eq!(policy.ping_retry_backoff_sec, 5);
        assert_eq!(policy.max_bounce_attempts_per_cycle, 3);
        assert_eq!(policy.cycle_delay_sec, 5);
        assert_eq!(policy.max_cycles, 0);
        assert!(policy.stop_on_failure);
    }
}
