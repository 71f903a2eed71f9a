//! Population member.

use crate::models::Cost;

/// A tour snapshot together with its cost ("fitness").
///
/// The tour is stored as a successor array. Lower fitness is better.
///
/// # Examples
///
/// ```
/// use u_tsp::models::Cost;
/// use u_tsp::population::Individual;
///
/// let ind = Individual::new(Cost::new(12), vec![1, 2, 0]);
/// assert_eq!(ind.fitness(), Cost::new(12));
/// assert_eq!(ind.successors(), &[1, 2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    fitness: Cost,
    successors: Vec<usize>,
}

impl Individual {
    pub fn new(fitness: Cost, successors: Vec<usize>) -> Self {
        Self {
            fitness,
            successors,
        }
    }

    pub fn fitness(&self) -> Cost {
        self.fitness
    }

    pub fn successors(&self) -> &[usize] {
        &self.successors
    }

    /// Number of nodes in the stored tour.
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Number of edges of this tour missing from `other`, ignoring direction.
    pub fn distance_to(&self, other: &[usize]) -> usize {
        self.successors
            .iter()
            .enumerate()
            .filter(|&(v, &s)| other[v] != s && other[s] != v)
            .count()
    }
}
