//! Domain model types for tour problems.
//!
//! Provides the bounded cost type with its unbounded sentinels, planar node
//! coordinates, and the problem instance tying nodes to edge costs.

mod cost;
mod instance;
mod point;

pub use cost::Cost;
pub use instance::{Instance, LowerBound, ProblemType};
pub use point::Point;
