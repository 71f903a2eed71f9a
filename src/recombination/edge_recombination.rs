//! Edge recombination crossover (ERX).
//!
//! # Algorithm
//!
//! Build the edge map: for every node, the union of its neighbors in both
//! parents (at most four). Starting from the first parent's first node,
//! repeatedly remove the current node from every neighbor list and move to
//! the neighbor with the fewest remaining neighbors, ties broken by the
//! shorter edge. When the current node has no neighbors left, jump to a
//! random unvisited node.
//!
//! # Reference
//!
//! Whitley, D., Starkweather, T., Fuquay, D. (1989). "Scheduling problems and
//! traveling salesmen: the genetic edge recombination operator",
//! *Proc. 3rd Int. Conf. on Genetic Algorithms*, 133-140.

use rand::rngs::StdRng;
use rand::Rng;

use super::Crossover;
use crate::error::{Result, SolverError};
use crate::models::Instance;
use crate::tour::{validate_successors, TourStore, FIRST_NODE};

/// Edge recombination crossover.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tsp::models::{Instance, Point};
/// use u_tsp::recombination::{Crossover, EdgeRecombination};
/// use u_tsp::tour::TourStore;
///
/// let points: Vec<Point> = (0..6).map(|i| Point::new(i as f64, 0.0)).collect();
/// let inst = Instance::from_points("line", &points).unwrap();
/// let first = vec![1, 2, 3, 4, 5, 0];
/// let second = vec![2, 0, 4, 1, 5, 3];
/// let mut tour = TourStore::new(6);
/// let mut rng = StdRng::seed_from_u64(0);
///
/// EdgeRecombination
///     .crossover(&inst, &first, &second, &mut tour, &mut rng)
///     .unwrap();
/// assert!(tour.is_consistent());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeRecombination;

impl Crossover for EdgeRecombination {
    fn crossover(
        &mut self,
        instance: &Instance,
        first: &[usize],
        second: &[usize],
        tour: &mut TourStore,
        rng: &mut StdRng,
    ) -> Result<()> {
        let n = tour.len();
        validate_successors(first, n)?;
        validate_successors(second, n)?;

        let mut edges: Vec<Vec<usize>> = vec![Vec::with_capacity(4); n];
        for parent in [first, second] {
            for (v, &s) in parent.iter().enumerate() {
                for (a, b) in [(v, s), (s, v)] {
                    if !edges[a].contains(&b) {
                        edges[a].push(b);
                    }
                }
            }
        }

        let mut visited = vec![false; n];
        let mut child = Vec::with_capacity(n);
        let mut current = FIRST_NODE;

        loop {
            visited[current] = true;
            child.push(current);
            if child.len() == n {
                break;
            }
            let neighbors = edges[current].clone();
            for &nb in &neighbors {
                edges[nb].retain(|&x| x != current);
            }

            let next = neighbors
                .iter()
                .copied()
                .filter(|&nb| !visited[nb])
                .min_by_key(|&nb| (edges[nb].len(), instance.cost(current, nb), nb));

            current = match next {
                Some(nb) => nb,
                None => {
                    let unvisited: Vec<usize> = (0..n).filter(|&v| !visited[v]).collect();
                    let pick = rng.random_range(0..unvisited.len() as u64) as usize;
                    unvisited[pick]
                }
            };
        }

        tour.set_order(&child).map_err(|e| {
            SolverError::Engine(format!("edge recombination produced an invalid child: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use rand::SeedableRng;

    fn inst(n: usize) -> Instance {
        let points: Vec<Point> = (0..n)
            .map(|i| Point::new((i * 13 % 17) as f64 * 5.0, (i * 7 % 11) as f64 * 5.0))
            .collect();
        Instance::from_points("scatter", &points).expect("valid")
    }

    fn succ_of(order: &[usize]) -> Vec<usize> {
        let mut succ = vec![0; order.len()];
        for i in 0..order.len() {
            succ[order[i]] = order[(i + 1) % order.len()];
        }
        succ
    }

    #[test]
    fn test_identical_parents_reproduce_parent() {
        let inst = inst(9);
        let order = vec![0, 4, 2, 7, 1, 8, 3, 6, 5];
        let succ = succ_of(&order);
        let mut tour = TourStore::new(9);
        let mut rng = StdRng::seed_from_u64(1);
        EdgeRecombination
            .crossover(&inst, &succ, &succ, &mut tour, &mut rng)
            .expect("crossover");
        // The child is the parent cycle, possibly walked in reverse.
        assert_eq!(tour.edge_distance(&succ), 0);
    }

    #[test]
    fn test_child_is_hamiltonian() {
        let inst = inst(12);
        let a: Vec<usize> = (0..12).collect();
        let b = vec![0, 5, 10, 3, 8, 1, 6, 11, 4, 9, 2, 7];
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let mut tour = TourStore::new(12);
            EdgeRecombination
                .crossover(&inst, &succ_of(&a), &succ_of(&b), &mut tour, &mut rng)
                .expect("crossover");
            assert!(tour.is_consistent());
        }
    }

    #[test]
    fn test_child_mostly_inherits_parent_edges() {
        let inst = inst(10);
        let a: Vec<usize> = (0..10).collect();
        let b = vec![0, 1, 2, 3, 4, 6, 5, 7, 8, 9];
        let (sa, sb) = (succ_of(&a), succ_of(&b));
        let mut tour = TourStore::new(10);
        let mut rng = StdRng::seed_from_u64(3);
        EdgeRecombination
            .crossover(&inst, &sa, &sb, &mut tour, &mut rng)
            .expect("crossover");
        let foreign = tour
            .walk()
            .filter(|&v| {
                let s = tour.suc(v);
                sa[v] != s && sa[s] != v && sb[v] != s && sb[s] != v
            })
            .count();
        assert!(foreign <= 2, "foreign edges = {foreign}");
    }

    #[test]
    fn test_rejects_invalid_parent() {
        let inst = inst(6);
        let mut tour = TourStore::new(6);
        let mut rng = StdRng::seed_from_u64(0);
        let good = succ_of(&[0, 1, 2, 3, 4, 5]);
        let result =
            EdgeRecombination.crossover(&inst, &good, &[0, 0, 0, 0, 0, 0], &mut tour, &mut rng);
        assert!(result.is_err());
    }
}
