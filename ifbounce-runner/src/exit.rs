//! Exit codes.
//!
//! The code space is deliberately tiny: operators script against it.

use crate::run::RunVerdict;

/// Exit code constants.
pub mod codes {
    /// Normal completion, including a cleanly-interrupted run.
    pub const SUCCESS: i32 = 0;
    /// Link never came up or reachability was exhausted; the interface
    /// was restored before exit. Also used for rejected arguments.
    pub const RECOVERY_FAILED: i32 = 1;
    /// The final restoration itself failed; the interface may be left
    /// administratively down.
    pub const RESTORE_FAILED: i32 = 2;
}

/// Map a run verdict to its exit code.
pub fn exit_code(verdict: &RunVerdict) -> i32 {
    match verdict {
        RunVerdict::Clean | RunVerdict::Interrupted => codes::SUCCESS,
        RunVerdict::RecoveryFailed(_) => codes::RECOVERY_FAILED,
        RunVerdict::RestorationFailed(_) => codes::RESTORE_FAILED,
    }
}
