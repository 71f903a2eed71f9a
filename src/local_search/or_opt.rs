//! Candidate-restricted Or-opt on a closed tour.
//!
//! # Algorithm
//!
//! Tries moving segments of 1, 2, or 3 consecutive nodes to a different
//! position in the cycle, in either orientation. Insertion points are limited
//! to the tour edges adjacent to a candidate neighbor of either segment end.
//!
//! # Complexity
//!
//! O(n·k) per pass for k candidates per node, O(n) per applied move.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::two_opt::positions;
use crate::candidates::CandidateSet;
use crate::distance::DistanceMatrix;
use crate::models::Cost;

/// Applies Or-opt improvement to a closed tour.
///
/// Returns the improved visiting order and its length.
///
/// # Examples
///
/// ```
/// use u_tsp::models::{Instance, Point};
/// use u_tsp::candidates::CandidateSet;
/// use u_tsp::local_search::{or_opt_improve, tour_length};
///
/// let points: Vec<Point> = (0..6).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
/// let inst = Instance::from_points("line", &points).unwrap();
/// let cands = CandidateSet::nearest_neighbors(&inst, 4);
///
/// let start = [0, 3, 1, 2, 4, 5];
/// let (_, len) = or_opt_improve(&start, inst.distances(), &cands);
/// assert!(len <= tour_length(&start, inst.distances()));
/// ```
pub fn or_opt_improve(
    order: &[usize],
    distances: &DistanceMatrix,
    candidates: &CandidateSet,
) -> (Vec<usize>, Cost) {
    let mut tour = order.to_vec();
    let n = tour.len();

    let mut improved = true;
    while improved {
        improved = false;
        for seg_len in 1..=3 {
            if n < seg_len + 3 {
                break;
            }
            while try_or_opt_pass(&mut tour, distances, candidates, seg_len) {
                improved = true;
            }
        }
    }

    let len = tour_length(&tour, distances);
    (tour, len)
}

/// Length of the closed tour visiting `order`.
///
/// Returns [`Cost::ZERO`] for an empty order.
pub fn tour_length(order: &[usize], distances: &DistanceMatrix) -> Cost {
    let n = order.len();
    if n == 0 {
        return Cost::ZERO;
    }
    (0..n)
        .map(|i| Cost::new(distances.get(order[i], order[(i + 1) % n])))
        .sum()
}

/// One first-improvement pass for a fixed segment length.
fn try_or_opt_pass(
    tour: &mut Vec<usize>,
    distances: &DistanceMatrix,
    candidates: &CandidateSet,
    seg_len: usize,
) -> bool {
    let n = tour.len();
    let pos = positions(tour);
    let d = |a: usize, b: usize| distances.get(a, b);

    for from in 0..n {
        let first = tour[from];
        let last = tour[(from + seg_len - 1) % n];
        let prev = tour[(from + n - 1) % n];
        let next = tour[(from + seg_len) % n];
        let in_segment = |v: usize| (pos[v] + n - from) % n < seg_len;

        let removal_gain = d(prev, first) + d(last, next) - d(prev, next);
        if removal_gain <= 0 {
            continue;
        }

        for end in [first, last] {
            for cand in candidates.neighbors(end) {
                let c = cand.to;
                if in_segment(c) {
                    continue;
                }
                let pc = pos[c];
                let sides = [(tour[(pc + n - 1) % n], c), (c, tour[(pc + 1) % n])];
                for (p, q) in sides {
                    if in_segment(p) || in_segment(q) {
                        continue;
                    }
                    let forward = d(p, first) + d(last, q) - d(p, q);
                    let backward = d(p, last) + d(first, q) - d(p, q);
                    let (insertion, reversed) = if backward < forward {
                        (backward, true)
                    } else {
                        (forward, false)
                    };
                    if insertion < removal_gain {
                        move_segment(tour, from, seg_len, p, reversed);
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Moves the segment starting at position `from` to sit right after node `after`.
fn move_segment(tour: &mut Vec<usize>, from: usize, seg_len: usize, after: usize, reversed: bool) {
    let n = tour.len();
    let mut segment: Vec<usize> = (0..seg_len).map(|k| tour[(from + k) % n]).collect();
    if reversed {
        segment.reverse();
    }
    let rest: Vec<usize> = (0..n - seg_len)
        .map(|k| tour[(from + seg_len + k) % n])
        .collect();
    let at = rest
        .iter()
        .position(|&v| v == after)
        .map_or(rest.len(), |i| i + 1);

    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&rest[..at]);
    out.extend(segment);
    out.extend_from_slice(&rest[at..]);
    *tour = out;
}
