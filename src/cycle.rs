use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::fsops::WatchFs;
use crate::repair::{run_repair, RepairPolicy};

/// Cross-cycle state for the watch target.
///
/// Exactly one writer (the scheduler's sequential loop). Created empty at
/// startup, updated in place once per tick, discarded at process exit —
/// nothing here survives a restart.
#[derive(Debug)]
pub struct CycleHistory {
    /// Trimmed content read on the most recent cycle; empty if the read
    /// failed or the file was empty.
    last_observed: String,
    /// Most recent non-empty `last_observed`. The repair source. Never
    /// regresses to empty once set.
    last_good: String,
    /// True only until the first cycle completes; suppresses "content
    /// changed" reporting when there is no prior baseline.
    first_cycle: bool,
}

impl CycleHistory {
    pub fn new() -> Self {
        Self {
            last_observed: String::new(),
            last_good: String::new(),
            first_cycle: true,
        }
    }

    #[allow(dead_code)]
    pub fn last_observed(&self) -> &str {
        &self.last_observed
    }

    #[allow(dead_code)]
    pub fn last_good(&self) -> &str {
        &self.last_good
    }
}

impl Default for CycleHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single cycle concluded about the watch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Stat failed. The file is in an unknown state, so nothing was read,
    /// touched, or written, and history is untouched.
    Skipped,
    /// Non-empty content observed; `last_good` refreshed.
    Healthy,
    /// Empty content observed. `repaired` is true when a repair write was
    /// attempted (not necessarily succeeded).
    Truncated { repaired: bool },
}

/// One observation-and-maybe-repair pass over the watch target.
///
/// Stat failure aborts the whole cycle; every later failure is handled
/// locally and the cycle runs to completion. Nothing here ever propagates an
/// error to the caller — the scheduler must keep ticking no matter what.
pub fn run_cycle(
    fs: &dyn WatchFs,
    path: &Path,
    policy: &RepairPolicy,
    history: &mut CycleHistory,
) -> CycleOutcome {
    let info = match fs.stat(path) {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, path = %path.display(), "stat error");
            return CycleOutcome::Skipped;
        }
    };

    let contents = match fs.read_to_string(path) {
        Ok(raw) => raw.trim().to_string(),
        Err(e) => {
            error!(error = %e, "read error");
            String::new()
        }
    };

    // Liveness signal; independent of content handling.
    let touch_result = match fs.touch(path) {
        Ok(()) => "ok",
        Err(e) => {
            error!(error = %e, "touch error");
            "failed"
        }
    };

    if !history.first_cycle && history.last_observed != contents {
        warn!(last = %history.last_observed, now = %contents, "content changed");
    }

    let mode = format!("{:o}", info.mode);
    info!(
        name = %info.name,
        size = info.size,
        mode = %mode,
        touch = touch_result,
        content = %contents,
        "fileinfo"
    );

    history.last_observed = contents;

    let outcome = if !history.last_observed.is_empty() {
        history.last_good = history.last_observed.clone();
        CycleOutcome::Healthy
    } else {
        error!(last_good = %history.last_good, now = %history.last_observed, "file truncated!");
        if policy.fix {
            run_repair(fs, path, &history.last_good, policy);
            CycleOutcome::Truncated { repaired: true }
        } else {
            CycleOutcome::Truncated { repaired: false }
        }
    };

    debug!(
        content = %history.last_observed,
        last_observed = %history.last_observed,
        last_good = %history.last_good,
        "cycle state"
    );
    history.first_cycle = false;

    outcome
}
