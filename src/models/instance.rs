//! Problem instance and problem-variant flags.

use serde::{Deserialize, Serialize};

use super::{Cost, Point};
use crate::distance::DistanceMatrix;
use crate::error::{Result, SolverError};

/// Problem variant being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProblemType {
    /// Symmetric traveling salesman problem.
    #[default]
    Tsp,
    /// Hamiltonian cycle problem.
    Hcp,
    /// Hamiltonian path problem.
    Hpp,
}

impl ProblemType {
    /// Returns `true` when every edge is legal by construction, so tour edges
    /// discovered by recombination never need forced candidate insertion.
    pub fn has_exhaustive_edges(self) -> bool {
        matches!(self, ProblemType::Hcp | ProblemType::Hpp)
    }
}

/// Lower bound obtained by an external ascent before the run loop starts.
///
/// `solved` is set when the ascent itself produced a tour (zero norm), in
/// which case the bound is the optimum and no trials are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerBound {
    pub cost: Cost,
    pub solved: bool,
}

/// A tour problem: a fixed node set and the cost of every edge.
///
/// # Examples
///
/// ```
/// use u_tsp::models::{Instance, Point, ProblemType};
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let instance = Instance::from_points("square", &points).unwrap();
/// assert_eq!(instance.dimension(), 4);
/// assert_eq!(instance.problem_type(), ProblemType::Tsp);
/// assert_eq!(instance.cost(0, 2), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    problem_type: ProblemType,
    distances: DistanceMatrix,
}

impl Instance {
    /// Smallest dimension for which a tour has distinct predecessor and successor.
    pub const MIN_DIMENSION: usize = 3;

    pub fn new(name: impl Into<String>, distances: DistanceMatrix) -> Result<Self> {
        if distances.size() < Self::MIN_DIMENSION {
            return Err(SolverError::InvalidConfig(format!(
                "instance needs at least {} nodes, got {}",
                Self::MIN_DIMENSION,
                distances.size()
            )));
        }
        Ok(Self {
            name: name.into(),
            problem_type: ProblemType::Tsp,
            distances,
        })
    }

    pub fn from_points(name: impl Into<String>, points: &[Point]) -> Result<Self> {
        Self::new(name, DistanceMatrix::from_points(points))
    }

    /// Sets the problem variant.
    pub fn with_problem_type(mut self, problem_type: ProblemType) -> Self {
        self.problem_type = problem_type;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.distances.size()
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Cost of the edge between `a` and `b`.
    #[inline]
    pub fn cost(&self, a: usize, b: usize) -> i64 {
        self.distances.get(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_tiny_instances() {
        let err = Instance::new("pair", DistanceMatrix::new(2)).unwrap_err();
        assert!(matches!(err, SolverError::InvalidConfig(_)));
    }

    #[test]
    fn test_problem_type_exhaustive_edges() {
        assert!(!ProblemType::Tsp.has_exhaustive_edges());
        assert!(ProblemType::Hcp.has_exhaustive_edges());
        assert!(ProblemType::Hpp.has_exhaustive_edges());
    }

    #[test]
    fn test_with_problem_type() {
        let inst = Instance::new("hcp", DistanceMatrix::new(4))
            .expect("valid")
            .with_problem_type(ProblemType::Hcp);
        assert_eq!(inst.problem_type(), ProblemType::Hcp);
        assert_eq!(inst.name(), "hcp");
    }

    #[test]
    fn test_problem_type_serde_uppercase() {
        let json = serde_json::to_string(&ProblemType::Hpp).expect("serialize");
        assert_eq!(json, "\"HPP\"");
    }
}
