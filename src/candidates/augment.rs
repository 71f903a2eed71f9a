//! Forced insertion of recombination edges into the candidate set.

use tracing::trace;

use super::set::{CandidateSet, FORCED_PRIORITY};
use crate::models::Instance;
use crate::tour::{edges, TourStore, FIRST_NODE};

impl CandidateSet {
    /// Inserts the edge `{a, b}` in both directions with forced priority.
    ///
    /// Returns the number of directed edges that were not forced before.
    pub fn force_include(&mut self, a: usize, b: usize, cost: i64) -> usize {
        usize::from(self.add(a, b, cost, FORCED_PRIORITY))
            + usize::from(self.add(b, a, cost, FORCED_PRIORITY))
    }
}

/// Feeds every edge of the live tour into the candidate set as a forced edge
/// and records the tour as the `InitialSuc` snapshot.
///
/// Edge insertion is skipped for problem variants whose edges are all legal
/// by construction; the snapshot is refreshed regardless. Returns the number
/// of newly forced directed edges.
pub fn augment_from_tour(
    candidates: &mut CandidateSet,
    instance: &Instance,
    tour: &mut TourStore,
) -> usize {
    let mut added = 0;
    if !instance.problem_type().has_exhaustive_edges() {
        for (v, s) in edges(tour.successors(), FIRST_NODE) {
            added += candidates.force_include(v, s, instance.cost(v, s));
        }
    }
    tour.refresh_initial_tour();
    trace!(added, "forced tour edges into candidate set");
    added
}
