//! Tour representation.
//!
//! - [`TourStore`] — Live successor/predecessor arena plus best, input and
//!   initial snapshots
//! - [`Walk`] — Finite traversal of a successor chain from an anchor node

mod store;
mod walk;

pub use store::{validate_successors, TourStore, FIRST_NODE};
pub use walk::{edges, Walk};
