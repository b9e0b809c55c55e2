use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::cycle::{run_cycle, CycleHistory, CycleOutcome};
use crate::fsops::WatchFs;
use crate::repair::RepairPolicy;

/// Drives one watch cycle per fixed interval, forever.
///
/// Cycles are strictly sequential: each runs to completion inside the tick
/// before the next tick is awaited, so a slow filesystem delays the schedule
/// rather than overlapping cycles. There is no internal stop condition; only
/// process termination ends the loop, and no per-cycle failure escapes it.
pub struct Scheduler<F: WatchFs> {
    fs: F,
    target: PathBuf,
    policy: RepairPolicy,
    interval: Duration,
    history: CycleHistory,
}

impl<F: WatchFs> Scheduler<F> {
    /// `interval` must be non-zero; config validation rejects zero upstream.
    pub fn new(fs: F, target: PathBuf, policy: RepairPolicy, interval: Duration) -> Self {
        Self {
            fs,
            target,
            policy,
            interval,
            history: CycleHistory::new(),
        }
    }

    /// Run one cycle immediately. `run` calls this on every tick; tests call
    /// it directly to step the state machine without a timer.
    pub fn tick_once(&mut self) -> CycleOutcome {
        run_cycle(&self.fs, &self.target, &self.policy, &mut self.history)
    }

    /// Main daemon loop.
    pub async fn run(mut self) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // tokio intervals fire immediately on the first tick; swallow it so
        // the first cycle lands one full interval after startup, like a
        // conventional ticker.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let outcome = self.tick_once();
            debug!(?outcome, "cycle complete");
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &CycleHistory {
        &self.history
    }
}
