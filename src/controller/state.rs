//! Mutable state of one run.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::RunConfig;
use super::telemetry::OptimumTracker;

/// Lifecycle of the run loop.
///
/// `Init → Running → {TimeExpired | Converged | Exhausted} → Done`. A tight
/// lower bound goes straight from `Init` to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Running,
    TimeExpired,
    Converged,
    Exhausted,
    Done,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The wall-time budget ran out before an iteration started.
    TimeExpired,
    /// A trial matched the optimum held before it.
    Converged,
    /// Every budgeted iteration ran.
    Exhausted,
    /// A tight lower bound made the trials unnecessary.
    Solved,
}

/// Run index, budget, optimum bookkeeping and the seeded generator.
#[derive(Debug)]
pub struct RunState {
    pub run: usize,
    pub runs: usize,
    pub tracker: OptimumTracker,
    seed: u64,
    pub rng: StdRng,
    phase: RunPhase,
    stop_reason: Option<StopReason>,
}

impl RunState {
    /// Creates the state for a fresh run seeded from `config`.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            run: 0,
            runs: config.runs,
            tracker: OptimumTracker::new(config.optimum_cost()),
            seed: config.seed,
            rng: StdRng::seed_from_u64(config.seed),
            phase: RunPhase::Init,
            stop_reason: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Seed of the current iteration.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Enters `Running`.
    pub fn start(&mut self) {
        self.transition(RunPhase::Running);
    }

    /// Leaves `Running` for the terminal phase matching `reason`.
    pub fn stop(&mut self, reason: StopReason) {
        let phase = match reason {
            StopReason::TimeExpired => RunPhase::TimeExpired,
            StopReason::Converged => RunPhase::Converged,
            StopReason::Exhausted => RunPhase::Exhausted,
            StopReason::Solved => RunPhase::Done,
        };
        self.stop_reason = Some(reason);
        self.transition(phase);
    }

    /// Enters `Done`, recording `Exhausted` if no other reason was set.
    pub fn finish(&mut self) {
        if self.stop_reason.is_none() {
            self.stop(StopReason::Exhausted);
        }
        self.transition(RunPhase::Done);
    }

    /// Increments the seed and restarts the generator from it.
    pub fn reseed(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn transition(&mut self, to: RunPhase) {
        if self.phase != to {
            debug!(from = ?self.phase, to = ?to, "run phase");
            self.phase = to;
        }
    }
}
