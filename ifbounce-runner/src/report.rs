//! Final run summary.
//!
//! Read-only view over the cycle records; nothing here mutates run
//! state.

use std::fmt;

use crate::orchestrator::{CycleOutcome, RunState};

/// Aggregated statistics for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_cycles: usize,
    pub successful_cycles: usize,
    /// Successes over completed (non-aborted) cycles, 0.0 when none ran.
    pub success_rate: f64,
    /// Mean wall time of completed cycles in seconds, 0.0 when none ran.
    pub avg_cycle_duration_sec: f64,
    /// Unix seconds at run start.
    pub started_at: u64,
}

impl RunSummary {
    /// Compute the summary from closed cycle records.
    pub fn from_state(state: &RunState) -> Self {
        let completed: Vec<_> = state
            .cycles
            .iter()
            .filter(|c| c.outcome != CycleOutcome::Aborted)
            .collect();
        let successful = completed
            .iter()
            .filter(|c| c.outcome == CycleOutcome::Success)
            .count();

        let success_rate = if completed.is_empty() {
            0.0
        } else {
            successful as f64 / completed.len() as f64
        };
        let avg_cycle_duration_sec = if completed.is_empty() {
            0.0
        } else {
            let total: u64 = completed.iter().map(|c| c.ended_at - c.started_at).sum();
            total as f64 / completed.len() as f64
        };

        Self {
            total_cycles: state.cycles.len(),
            successful_cycles: successful,
            success_rate,
            avg_cycle_duration_sec,
            started_at: state.started_at,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run summary:")?;
        writeln!(f, "  Cycles run:        {}", self.total_cycles)?;
        writeln!(f, "  Successful cycles: {}", self.successful_cycles)?;
        writeln!(f, "  Success rate:      {:.0}%", self.success_rate * 100.0)?;
        write!(
            f,
            "  Avg cycle length:  {:.1}s",
            self.avg_cycle_duration_sec
        )
    }
}
