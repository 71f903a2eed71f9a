//! Distance matrices.
//!
//! Provides a dense integer distance matrix for tour problems.

mod matrix;

pub use matrix::DistanceMatrix;
