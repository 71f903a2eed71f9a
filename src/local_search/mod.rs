//! Local search for closed tours.
//!
//! - [`LocalSearch`] — One trial: optimize the live tour, return its cost
//! - [`TwoOptEngine`] — Built-in kick-and-descend engine
//! - [`two_opt_improve`] — Candidate-restricted 2-opt edge reversal
//! - [`or_opt_improve`] — Candidate-restricted segment relocation

mod engine;
mod or_opt;
mod two_opt;

pub use engine::{LocalSearch, SearchContext, TwoOptEngine};
pub use or_opt::{or_opt_improve, tour_length};
pub use two_opt::two_opt_improve;
