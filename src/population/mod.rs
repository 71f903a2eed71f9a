//! Steady-state genetic population.
//!
//! - [`Individual`] — Tour snapshot plus fitness
//! - [`Population`] — Bounded, ascending-fitness member list with
//!   duplicate-fitness lookup, eviction and replacement
//! - [`linear_select`] — Linear-ranking selection used to pick parents

mod individual;
mod manager;
mod selection;

pub use individual::Individual;
pub use manager::{Population, ReplacementPolicy};
pub use selection::linear_select;
