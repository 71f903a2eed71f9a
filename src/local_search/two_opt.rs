//! Candidate-restricted 2-opt on a closed tour.
//!
//! # Algorithm
//!
//! For each tour edge (a, b) and each candidate neighbor c of a, with d the
//! successor of c, compute the change from replacing (a, b) and (c, d) by
//! (a, c) and (b, d):
//!
//! ```text
//! delta = d(a, c) + d(b, d) - d(a, b) - d(c, d)
//! ```
//!
//! If delta < 0, reverse the path b..c and accept the improvement. Repeat
//! until no candidate move improves (first-improvement strategy). The
//! shorter side of the cycle is always the one reversed.
//!
//! # Complexity
//!
//! O(n·k) move evaluations per pass for k candidates per node, plus O(n)
//! per applied reversal.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::or_opt::tour_length;
use crate::candidates::CandidateSet;
use crate::distance::DistanceMatrix;
use crate::models::Cost;

/// Applies 2-opt improvement to a closed tour given as a visiting order.
///
/// Only moves that add an edge from a node to one of its candidates are
/// considered. Returns the improved order and its length.
///
/// # Examples
///
/// ```
/// use u_tsp::models::{Instance, Point};
/// use u_tsp::candidates::CandidateSet;
/// use u_tsp::local_search::two_opt_improve;
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// let inst = Instance::from_points("square", &points).unwrap();
/// let cands = CandidateSet::nearest_neighbors(&inst, 3);
///
/// // 0 → 2 → 1 → 3 crosses itself
/// let (_, len) = two_opt_improve(&[0, 2, 1, 3], inst.distances(), &cands);
/// assert_eq!(len.value(), 40);
/// ```
pub fn two_opt_improve(
    order: &[usize],
    distances: &DistanceMatrix,
    candidates: &CandidateSet,
) -> (Vec<usize>, Cost) {
    let n = order.len();
    let mut tour = order.to_vec();
    if n < 4 {
        let len = tour_length(&tour, distances);
        return (tour, len);
    }

    let mut pos = positions(&tour);
    let mut improved = true;

    while improved {
        improved = false;
        for i in 0..n {
            let a = tour[i];
            let b = tour[(i + 1) % n];
            for cand in candidates.neighbors(a) {
                let c = cand.to;
                if c == b {
                    continue;
                }
                let j = pos[c];
                let d = tour[(j + 1) % n];
                if d == a {
                    continue;
                }
                let delta = distances.get(a, c) + distances.get(b, d)
                    - distances.get(a, b)
                    - distances.get(c, d);
                if delta < 0 {
                    reverse_between(&mut tour, &mut pos, (i + 1) % n, j);
                    improved = true;
                    break;
                }
            }
        }
    }

    let len = tour_length(&tour, distances);
    (tour, len)
}

/// Position of every node in `tour`.
pub(crate) fn positions(tour: &[usize]) -> Vec<usize> {
    let mut pos = vec![0; tour.len()];
    for (i, &v) in tour.iter().enumerate() {
        pos[v] = i;
    }
    pos
}

/// Reverses the cyclic slice `tour[from..=to]`, or its complement when that
/// is shorter. Both yield the same cycle.
fn reverse_between(tour: &mut [usize], pos: &mut [usize], from: usize, to: usize) {
    let n = tour.len();
    let len = (to + n - from) % n + 1;
    let (mut l, mut r, len) = if 2 * len > n {
        ((to + 1) % n, (from + n - 1) % n, n - len)
    } else {
        (from, to, len)
    };
    for _ in 0..len / 2 {
        tour.swap(l, r);
        pos[tour[l]] = l;
        pos[tour[r]] = r;
        l = (l + 1) % n;
        r = (r + n - 1) % n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Instance, Point};

    fn square_with_center() -> Instance {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, -3.0),
        ];
        Instance::from_points("square", &points).expect("valid")
    }

    fn is_permutation(order: &[usize], n: usize) -> bool {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        sorted == (0..n).collect::<Vec<_>>()
    }

    #[test]
    fn test_2opt_already_optimal() {
        let inst = square_with_center();
        let cands = CandidateSet::nearest_neighbors(&inst, 4);
        let start = vec![0, 4, 1, 2, 3];
        let before = tour_length(&start, inst.distances());
        let (after_order, after) = two_opt_improve(&start, inst.distances(), &cands);
        assert_eq!(after, before);
        assert!(is_permutation(&after_order, 5));
    }

    #[test]
    fn test_2opt_removes_crossing() {
        let inst = square_with_center();
        let cands = CandidateSet::nearest_neighbors(&inst, 4);
        let start = vec![0, 2, 1, 4, 3];
        let before = tour_length(&start, inst.distances());
        let (order, after) = two_opt_improve(&start, inst.distances(), &cands);
        assert!(after < before);
        assert!(is_permutation(&order, 5));
        assert_eq!(after, tour_length(&order, inst.distances()));
    }

    #[test]
    fn test_2opt_tiny_tour() {
        let inst = square_with_center();
        let cands = CandidateSet::empty(5);
        let (order, len) = two_opt_improve(&[0, 1, 2], inst.distances(), &cands);
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(len, tour_length(&[0, 1, 2], inst.distances()));
    }

    #[test]
    fn test_reverse_between_wraps() {
        let mut tour = vec![0, 1, 2, 3, 4, 5];
        let mut pos = positions(&tour);
        reverse_between(&mut tour, &mut pos, 4, 1);
        // Segment 4,5,0,1 is longer than half, so 2,3 is reversed instead.
        assert_eq!(tour, vec![0, 1, 3, 2, 4, 5]);
        assert_eq!(pos, positions(&tour));
    }

    #[test]
    fn test_reverse_between_short_segment() {
        let mut tour = vec![0, 1, 2, 3, 4, 5];
        let mut pos = positions(&tour);
        reverse_between(&mut tour, &mut pos, 1, 3);
        assert_eq!(tour, vec![0, 3, 2, 1, 4, 5]);
        assert_eq!(pos, positions(&tour));
    }
}
