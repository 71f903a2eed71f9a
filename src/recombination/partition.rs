//! Partition merge.
//!
//! # Algorithm
//!
//! The union of two tours, minus the edges they share, splits into connected
//! components. Inside a component every node has as many differing edges
//! from one tour as from the other, so swapping in the reference tour's
//! adjacency for all nodes of a component keeps every degree at two. The
//! swap is kept when the result is still a single cycle and it is strictly
//! shorter.
//!
//! Components are tried one at a time, smallest node first, each against the
//! tour left by the previous swaps. With fusion enabled, components that are
//! infeasible alone are then retried in pairs.
//!
//! # Reference
//!
//! Whitley, D., Hains, D., Howe, A. (2009). "Tunneling between optima:
//! partition crossover for the traveling salesman problem", *GECCO*.

use tracing::trace;

use super::TourMerger;
use crate::error::Result;
use crate::models::{Cost, Instance};
use crate::tour::{validate_successors, TourStore, FIRST_NODE};

/// Upper bound on infeasible components considered for pairwise fusion.
const MAX_FUSION_COMPONENTS: usize = 64;

/// Merges by swapping whole components of the differing-edge graph.
#[derive(Debug, Clone, Default)]
pub struct PartitionMerge {
    fuse: bool,
}

impl PartitionMerge {
    pub fn new() -> Self {
        Self { fuse: false }
    }

    /// Also tries pairs of components that are infeasible on their own.
    pub fn with_fusion(mut self) -> Self {
        self.fuse = true;
        self
    }
}

impl TourMerger for PartitionMerge {
    fn merge(
        &mut self,
        instance: &Instance,
        tour: &mut TourStore,
        cost: Cost,
        other: &[usize],
    ) -> Result<Cost> {
        let n = tour.len();
        validate_successors(other, n)?;

        let mut adj: Vec<[usize; 2]> = (0..n).map(|v| [tour.suc(v), tour.pred(v)]).collect();
        let other_adj = adjacency(other);
        let components = components(&adj, &other_adj);
        if components.is_empty() {
            return Ok(cost);
        }

        let mut total_gain = 0i64;
        let mut infeasible = Vec::new();
        for comp in &components {
            match try_swap(instance, &mut adj, &other_adj, comp) {
                Swap::Applied(gain) => total_gain += gain,
                Swap::Infeasible => infeasible.push(comp.clone()),
                Swap::NoGain => {}
            }
        }

        if self.fuse {
            infeasible.truncate(MAX_FUSION_COMPONENTS);
            let mut used = vec![false; infeasible.len()];
            for i in 0..infeasible.len() {
                for j in (i + 1)..infeasible.len() {
                    if used[i] || used[j] {
                        continue;
                    }
                    let fused: Vec<usize> = infeasible[i]
                        .iter()
                        .chain(infeasible[j].iter())
                        .copied()
                        .collect();
                    if let Swap::Applied(gain) = try_swap(instance, &mut adj, &other_adj, &fused) {
                        total_gain += gain;
                        used[i] = true;
                        used[j] = true;
                    }
                }
            }
        }

        trace!(
            components = components.len(),
            gain = total_gain,
            "partition merge"
        );

        if total_gain < 0 {
            tour.set_order(&cycle_order(&adj))?;
            Ok(cost + Cost::new(total_gain))
        } else {
            Ok(cost)
        }
    }
}

enum Swap {
    Applied(i64),
    Infeasible,
    NoGain,
}

/// Undirected neighbors of every node of a successor array.
fn adjacency(successors: &[usize]) -> Vec<[usize; 2]> {
    let mut adj = vec![[0usize; 2]; successors.len()];
    for (v, &s) in successors.iter().enumerate() {
        adj[v][0] = s;
        adj[s][1] = v;
    }
    adj
}

fn has_edge(adj: &[[usize; 2]], a: usize, b: usize) -> bool {
    adj[a][0] == b || adj[a][1] == b
}

/// Groups nodes touched by a differing edge into connected components.
fn components(adj: &[[usize; 2]], other_adj: &[[usize; 2]]) -> Vec<Vec<usize>> {
    let n = adj.len();
    let mut parent: Vec<usize> = (0..n).collect();
    let mut touched = vec![false; n];

    fn find(parent: &mut [usize], mut v: usize) -> usize {
        while parent[v] != v {
            parent[v] = parent[parent[v]];
            v = parent[v];
        }
        v
    }

    for v in 0..n {
        for (mine, theirs) in [(adj, other_adj), (other_adj, adj)] {
            for &u in &mine[v] {
                if !has_edge(theirs, v, u) {
                    touched[v] = true;
                    touched[u] = true;
                    let (rv, ru) = (find(&mut parent, v), find(&mut parent, u));
                    if rv != ru {
                        parent[rv.max(ru)] = rv.min(ru);
                    }
                }
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut slot = vec![usize::MAX; n];
    for v in 0..n {
        if !touched[v] {
            continue;
        }
        let root = find(&mut parent, v);
        if slot[root] == usize::MAX {
            slot[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[slot[root]].push(v);
    }
    groups
}

/// Swaps in `other_adj` for the nodes of `comp` if that keeps a single
/// shorter cycle.
fn try_swap(
    instance: &Instance,
    adj: &mut [[usize; 2]],
    other_adj: &[[usize; 2]],
    comp: &[usize],
) -> Swap {
    // Edges inside the component are counted from both ends, boundary edges
    // are shared and cancel.
    let mut delta = 0i64;
    for &v in comp {
        for k in 0..2 {
            delta += instance.cost(v, other_adj[v][k]) - instance.cost(v, adj[v][k]);
        }
    }
    let gain = delta / 2;

    let saved: Vec<[usize; 2]> = comp.iter().map(|&v| adj[v]).collect();
    for &v in comp {
        adj[v] = other_adj[v];
    }
    if !is_single_cycle(adj) {
        for (&v, &prev) in comp.iter().zip(&saved) {
            adj[v] = prev;
        }
        return Swap::Infeasible;
    }
    if gain >= 0 {
        for (&v, &prev) in comp.iter().zip(&saved) {
            adj[v] = prev;
        }
        return Swap::NoGain;
    }
    Swap::Applied(gain)
}

fn is_single_cycle(adj: &[[usize; 2]]) -> bool {
    cycle_order(adj).len() == adj.len()
}

/// Follows the undirected cycle through [`FIRST_NODE`].
fn cycle_order(adj: &[[usize; 2]]) -> Vec<usize> {
    let n = adj.len();
    let mut order = Vec::with_capacity(n);
    let mut prev = usize::MAX;
    let mut cur = FIRST_NODE;
    while order.len() < n {
        order.push(cur);
        let next = if adj[cur][0] != prev { adj[cur][0] } else { adj[cur][1] };
        prev = cur;
        cur = next;
        if cur == FIRST_NODE {
            break;
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn ring(n: usize) -> Instance {
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let angle = i as f64 / n as f64 * std::f64::consts::TAU;
                Point::new(100.0 * angle.cos(), 100.0 * angle.sin())
            })
            .collect();
        Instance::from_points("ring", &points).expect("valid")
    }

    fn succ_of(order: &[usize]) -> Vec<usize> {
        let mut succ = vec![0; order.len()];
        for i in 0..order.len() {
            succ[order[i]] = order[(i + 1) % order.len()];
        }
        succ
    }

    #[test]
    fn test_identical_tours_unchanged() {
        let inst = ring(8);
        let order: Vec<usize> = (0..8).collect();
        let mut tour = TourStore::from_order(&order).expect("valid");
        let cost = tour.length(inst.distances());
        let merged = PartitionMerge::new()
            .merge(&inst, &mut tour, cost, &succ_of(&order))
            .expect("merge");
        assert_eq!(merged, cost);
        assert_eq!(tour.order(), order);
    }

    #[test]
    fn test_reversed_reference_is_same_tour() {
        let inst = ring(8);
        let order: Vec<usize> = (0..8).collect();
        let reversed: Vec<usize> = (0..8).rev().collect();
        let mut tour = TourStore::from_order(&order).expect("valid");
        let cost = tour.length(inst.distances());
        let merged = PartitionMerge::new()
            .merge(&inst, &mut tour, cost, &succ_of(&reversed))
            .expect("merge");
        assert_eq!(merged, cost);
    }

    #[test]
    fn test_takes_better_component() {
        let inst = ring(10);
        // live tour has a detour 2-4-3-5 , reference is the ring
        let live = vec![0, 1, 2, 4, 3, 5, 6, 7, 8, 9];
        let reference: Vec<usize> = (0..10).collect();
        let mut tour = TourStore::from_order(&live).expect("valid");
        let cost = tour.length(inst.distances());
        let merged = PartitionMerge::new()
            .merge(&inst, &mut tour, cost, &succ_of(&reference))
            .expect("merge");
        assert!(merged < cost);
        assert_eq!(merged, tour.length(inst.distances()));
        assert!(tour.is_consistent());
    }

    #[test]
    fn test_never_worsens() {
        let inst = ring(10);
        let live: Vec<usize> = (0..10).collect();
        let reference = vec![0, 1, 2, 4, 3, 5, 6, 7, 9, 8];
        let mut tour = TourStore::from_order(&live).expect("valid");
        let cost = tour.length(inst.distances());
        for mut merger in [PartitionMerge::new(), PartitionMerge::new().with_fusion()] {
            let merged = merger
                .merge(&inst, &mut tour, cost, &succ_of(&reference))
                .expect("merge");
            assert_eq!(merged, cost);
            assert_eq!(tour.order(), live);
        }
    }

    #[test]
    fn test_rejects_invalid_reference() {
        let inst = ring(6);
        let mut tour = TourStore::new(6);
        let result =
            PartitionMerge::new().merge(&inst, &mut tour, Cost::new(10), &[1, 0, 3, 2, 5, 4]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cycle_order_walks_whole_tour() {
        let adj = adjacency(&succ_of(&[0, 3, 1, 4, 2]));
        assert_eq!(cycle_order(&adj), vec![0, 3, 1, 4, 2]);
    }
}
