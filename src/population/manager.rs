//! Bounded, fitness-sorted population.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::individual::Individual;
use crate::error::{Result, SolverError};
use crate::models::Cost;

/// Which member leaves a full population when a better tour arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Evict the member with the largest fitness.
    #[default]
    Worst,
    /// Among members strictly worse than the incoming tour, evict the one
    /// sharing the most edges with it; ties go to the worse member.
    Closest,
}

/// Steady-state population ordered by ascending fitness.
///
/// The last member is always the worst. The population never holds more
/// than `max_size` members.
///
/// # Examples
///
/// ```
/// use u_tsp::models::Cost;
/// use u_tsp::population::Population;
///
/// let mut pop = Population::new(3);
/// pop.add(Cost::new(120), vec![1, 2, 0]).unwrap();
/// pop.add(Cost::new(110), vec![2, 0, 1]).unwrap();
/// assert!(pop.has_fitness(Cost::new(120)));
/// assert_eq!(pop.fitnesses(), vec![Cost::new(110), Cost::new(120)]);
/// assert_eq!(pop.worst_index(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Individual>,
    max_size: usize,
}

impl Population {
    /// Creates an empty population holding at most `max_size` members.
    pub fn new(max_size: usize) -> Self {
        Self {
            members: Vec::new(),
            max_size,
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the population has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Capacity of the population.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns `true` once the population holds `max_size` members.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_size
    }

    /// Member at `index`, counted from the best.
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.members.get(index)
    }

    /// All members, best first.
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Fitness values in population order.
    pub fn fitnesses(&self) -> Vec<Cost> {
        self.members.iter().map(Individual::fitness).collect()
    }

    /// Returns `true` if a member with exactly this fitness exists.
    pub fn has_fitness(&self, cost: Cost) -> bool {
        self.members
            .binary_search_by(|m| m.fitness().cmp(&cost))
            .is_ok()
    }

    /// Inserts a tour, keeping fitness order. Fails when the population is full.
    ///
    /// Returns the index the new member landed at.
    pub fn add(&mut self, cost: Cost, successors: Vec<usize>) -> Result<usize> {
        if self.is_full() {
            return Err(SolverError::PopulationFull {
                capacity: self.max_size,
            });
        }
        Ok(self.insert_sorted(Individual::new(cost, successors)))
    }

    /// Index of the member with the largest fitness.
    pub fn worst_index(&self) -> Option<usize> {
        self.members.len().checked_sub(1)
    }

    /// Overwrites the member at `index` and restores fitness order.
    ///
    /// Returns the index the new member landed at.
    pub fn replace(&mut self, index: usize, cost: Cost, successors: Vec<usize>) -> Result<usize> {
        if index >= self.members.len() {
            return Err(SolverError::IndexOutOfRange {
                index,
                size: self.members.len(),
            });
        }
        self.members.remove(index);
        Ok(self.insert_sorted(Individual::new(cost, successors)))
    }

    /// Chooses the member to evict for an incoming tour, or `None` if the
    /// tour is not strictly better than the current worst.
    pub fn replacement_index(
        &self,
        cost: Cost,
        successors: &[usize],
        policy: ReplacementPolicy,
    ) -> Option<usize> {
        let worst = self.worst_index()?;
        if cost >= self.members[worst].fitness() {
            return None;
        }
        match policy {
            ReplacementPolicy::Worst => Some(worst),
            ReplacementPolicy::Closest => {
                let mut best = worst;
                let mut min_distance = usize::MAX;
                for (i, m) in self.members.iter().enumerate().rev() {
                    if m.fitness() <= cost {
                        break;
                    }
                    let d = m.distance_to(successors);
                    if d < min_distance {
                        min_distance = d;
                        best = i;
                    }
                }
                Some(best)
            }
        }
    }

    /// One line per member for trace output.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (i, m) in self.members.iter().enumerate() {
            let _ = write!(out, "{:>3}: {}", i + 1, m.fitness());
            if i > 0 {
                let d = m.distance_to(self.members[0].successors());
                let _ = write!(out, " (distance to best {d})");
            }
            out.push('\n');
        }
        out
    }

    fn insert_sorted(&mut self, individual: Individual) -> usize {
        let at = self
            .members
            .partition_point(|m| m.fitness() <= individual.fitness());
        self.members.insert(at, individual);
        at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ring(n: usize) -> Vec<usize> {
        (0..n).map(|v| (v + 1) % n).collect()
    }

    #[test]
    fn test_add_keeps_ascending_order() {
        let mut pop = Population::new(4);
        for c in [130, 110, 120] {
            pop.add(Cost::new(c), ring(3)).expect("room");
        }
        assert_eq!(
            pop.fitnesses(),
            vec![Cost::new(110), Cost::new(120), Cost::new(130)]
        );
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut pop = Population::new(usize::MAX);
        assert!(!pop.is_full());
        pop.add(Cost::new(7), ring(3)).expect("room");
        assert_eq!(pop.len(), 1);
        assert_eq!(pop.max_size(), usize::MAX);
    }

    #[test]
    fn test_add_fails_when_full() {
        let mut pop = Population::new(1);
        pop.add(Cost::new(5), ring(3)).expect("room");
        let err = pop.add(Cost::new(4), ring(3)).unwrap_err();
        assert!(matches!(err, SolverError::PopulationFull { capacity: 1 }));
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn test_replace_resorts() {
        let mut pop = Population::new(3);
        for c in [10, 20, 30] {
            pop.add(Cost::new(c), ring(3)).expect("room");
        }
        let worst = pop.worst_index().expect("non-empty");
        let at = pop.replace(worst, Cost::new(5), ring(3)).expect("in range");
        assert_eq!(at, 0);
        assert_eq!(
            pop.fitnesses(),
            vec![Cost::new(5), Cost::new(10), Cost::new(20)]
        );
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut pop = Population::new(2);
        assert!(matches!(
            pop.replace(0, Cost::new(1), ring(3)),
            Err(SolverError::IndexOutOfRange { index: 0, size: 0 })
        ));
    }

    #[test]
    fn test_worst_index_empty() {
        assert_eq!(Population::new(3).worst_index(), None);
    }

    #[test]
    fn test_replacement_index_requires_strict_improvement() {
        let mut pop = Population::new(2);
        pop.add(Cost::new(10), ring(4)).expect("room");
        pop.add(Cost::new(20), ring(4)).expect("room");
        assert_eq!(
            pop.replacement_index(Cost::new(20), &ring(4), ReplacementPolicy::Worst),
            None
        );
        assert_eq!(
            pop.replacement_index(Cost::new(19), &ring(4), ReplacementPolicy::Worst),
            Some(1)
        );
    }

    #[test]
    fn test_replacement_index_closest() {
        let mut pop = Population::new(3);
        // 0-1-2-3-4-5
        pop.add(Cost::new(10), ring(6)).expect("room");
        // 0-2-1-3-4-5: close to the incoming tour
        pop.add(Cost::new(30), vec![2, 3, 1, 4, 5, 0]).expect("room");
        // 0-3-1-4-2-5: far from it
        pop.add(Cost::new(40), vec![3, 4, 5, 1, 2, 0]).expect("room");

        let incoming = vec![2, 3, 1, 5, 0, 4]; // 0-2-1-3-5-4
        assert_eq!(
            pop.replacement_index(Cost::new(25), &incoming, ReplacementPolicy::Closest),
            Some(1)
        );
        assert_eq!(
            pop.replacement_index(Cost::new(25), &incoming, ReplacementPolicy::Worst),
            Some(2)
        );
    }

    #[test]
    fn test_describe_lists_members() {
        let mut pop = Population::new(2);
        pop.add(Cost::new(7), ring(3)).expect("room");
        pop.add(Cost::new(9), ring(3)).expect("room");
        let text = pop.describe();
        assert!(text.contains("1: 7"));
        assert!(text.contains("2: 9 (distance to best 0)"));
    }

    proptest! {
        #[test]
        fn prop_policy_keeps_bounded_unique_sorted(
            max in 1usize..6,
            costs in proptest::collection::vec(0i64..40, 0..60),
        ) {
            let mut pop = Population::new(max);
            for c in costs {
                let cost = Cost::new(c);
                if pop.has_fitness(cost) {
                    continue;
                }
                if !pop.is_full() {
                    pop.add(cost, ring(4)).expect("room");
                } else if let Some(i) = pop.replacement_index(cost, &ring(4), ReplacementPolicy::Worst) {
                    pop.replace(i, cost, ring(4)).expect("in range");
                }
                prop_assert!(pop.len() <= max);
                let f = pop.fitnesses();
                prop_assert!(f.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
