//! Tour recombination.
//!
//! - [`TourMerger`] — Folds the live tour with a reference tour, never
//!   increasing its cost
//! - [`Crossover`] — Builds a child tour from two parents
//! - [`Recombination`] — Configured merge strategy, resolved once into a
//!   [`TourMerger`]
//! - [`PartitionMerge`] — Partition-based merge over the differing edges
//! - [`SegmentTranscription`] — Copies cheaper subpaths from the reference
//! - [`EdgeRecombination`] — Edge recombination crossover (ERX)

mod edge_recombination;
mod partition;
mod transcription;

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Cost, Instance};
use crate::tour::TourStore;

pub use edge_recombination::EdgeRecombination;
pub use partition::PartitionMerge;
pub use transcription::SegmentTranscription;

/// Merges the live tour with another tour.
///
/// `cost` is the cost of the live tour on entry. Implementations may rewrite
/// the live tour and return its new cost, which must not exceed `cost`.
/// `other` is the reference tour as a successor array.
pub trait TourMerger {
    fn merge(
        &mut self,
        instance: &Instance,
        tour: &mut TourStore,
        cost: Cost,
        other: &[usize],
    ) -> Result<Cost>;
}

/// Synthesizes a child tour from two parents given as successor arrays.
///
/// The child replaces the live tour.
pub trait Crossover {
    fn crossover(
        &mut self,
        instance: &Instance,
        first: &[usize],
        second: &[usize],
        tour: &mut TourStore,
        rng: &mut StdRng,
    ) -> Result<()>;
}

/// Merge strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recombination {
    /// Subpath transcription.
    #[default]
    Ipt,
    /// Partition crossover applying each feasible component on its own.
    Gpx2,
    /// Partition crossover that also fuses pairs of infeasible components.
    Clarist,
}

impl Recombination {
    /// Resolves the strategy into a merger.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::recombination::Recombination;
    ///
    /// let merger = Recombination::Gpx2.merger();
    /// # let _ = merger;
    /// ```
    pub fn merger(self) -> Box<dyn TourMerger> {
        match self {
            Recombination::Ipt => Box::new(SegmentTranscription::new()),
            Recombination::Gpx2 => Box::new(PartitionMerge::new()),
            Recombination::Clarist => Box::new(PartitionMerge::new().with_fusion()),
        }
    }
}

impl fmt::Display for Recombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recombination::Ipt => "IPT",
            Recombination::Gpx2 => "GPX2",
            Recombination::Clarist => "CLARIST",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ipt() {
        assert_eq!(Recombination::default(), Recombination::Ipt);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Recombination::Clarist).expect("serialize");
        assert_eq!(json, "\"CLARIST\"");
        let parsed: Recombination = serde_json::from_str("\"GPX2\"").expect("parse");
        assert_eq!(parsed, Recombination::Gpx2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Recombination::Ipt.to_string(), "IPT");
    }
}
