//! Best-cost and optimum bookkeeping.

use std::fmt::Write as _;
use std::time::Duration;

use crate::models::Cost;

/// Tracks the best cost found, the optimum reference and the optimum held
/// before the current iteration.
///
/// # Examples
///
/// ```
/// use u_tsp::controller::OptimumTracker;
/// use u_tsp::models::Cost;
///
/// let mut tracker = OptimumTracker::new(Cost::new(100));
/// assert!(tracker.offer_best(Cost::new(120)));
/// assert!(!tracker.offer_optimum(Cost::new(120)));
/// assert_eq!(tracker.gap_percent(Cost::new(120)), Some(20.0));
/// assert_eq!(tracker.marker(Cost::new(100)), "=");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimumTracker {
    best_cost: Cost,
    optimum: Cost,
    previous_optimum: Cost,
}

impl OptimumTracker {
    pub fn new(optimum: Cost) -> Self {
        Self {
            best_cost: Cost::PLUS_INFINITY,
            optimum,
            previous_optimum: optimum,
        }
    }

    pub fn best_cost(&self) -> Cost {
        self.best_cost
    }

    pub fn optimum(&self) -> Cost {
        self.optimum
    }

    /// The optimum as it stood before the last [`offer_optimum`](Self::offer_optimum).
    pub fn previous_optimum(&self) -> Cost {
        self.previous_optimum
    }

    /// Records `cost` as the best cost if it is strictly lower.
    pub fn offer_best(&mut self, cost: Cost) -> bool {
        if cost < self.best_cost {
            self.best_cost = cost;
            true
        } else {
            false
        }
    }

    /// Remembers the current optimum, then lowers it to `cost` if `cost` is
    /// strictly lower.
    pub fn offer_optimum(&mut self, cost: Cost) -> bool {
        self.previous_optimum = self.optimum;
        if cost < self.optimum {
            self.optimum = cost;
            true
        } else {
            false
        }
    }

    /// A tight lower bound settles both the optimum and the best cost.
    pub fn settle(&mut self, bound: Cost) {
        self.best_cost = bound;
        self.optimum = bound;
        self.previous_optimum = bound;
    }

    /// `100 * (cost - optimum) / optimum`, skipped for an unknown or zero
    /// optimum.
    pub fn gap_percent(&self, cost: Cost) -> Option<f64> {
        cost.gap_percent(self.optimum)
    }

    /// `"<"` below the optimum, `"="` on it, empty above it.
    pub fn marker(&self, cost: Cost) -> &'static str {
        if cost < self.optimum {
            "<"
        } else if cost == self.optimum {
            "="
        } else {
            ""
        }
    }

    /// One progress line for iteration `run`.
    pub fn run_line(&self, run: usize, cost: Cost, elapsed: Duration) -> String {
        let mut line = format!("Run {run}: Cost = {cost}");
        if let Some(gap) = self.gap_percent(cost) {
            let _ = write!(line, ", Gap = {gap:.4}%");
        }
        let _ = write!(
            line,
            ", Time = {:.2} sec. {}",
            elapsed.as_secs_f64(),
            self.marker(cost)
        );
        line
    }

    /// One line for a merge that lowered the trial cost.
    pub fn merge_line(&self, member: usize, cost: Cost) -> String {
        let mut line = format!("Merged with {member}: Cost = {cost}");
        if let Some(gap) = self.gap_percent(cost) {
            let _ = write!(line, ", Gap = {gap:.4}%");
        }
        line
    }
}
