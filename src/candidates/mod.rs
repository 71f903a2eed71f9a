//! Candidate edges for the local-search engine.
//!
//! - [`CandidateSet`] — Priority-ordered neighbor lists, built from nearest neighbors
//! - [`augment_from_tour`] — Forces the edges of a recombined tour into the set

mod augment;
mod set;

pub use augment::augment_from_tour;
pub use set::{CandidateEdge, CandidateSet, FORCED_PRIORITY};
