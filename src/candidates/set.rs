//! Per-node candidate edge lists.

use crate::models::Instance;

/// Priority marking an edge the local search must always explore.
pub const FORCED_PRIORITY: u32 = u32::MAX;

/// A candidate edge leaving a node.
///
/// Higher priority is explored first; [`FORCED_PRIORITY`] edges are never
/// dropped from a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEdge {
    /// Neighbor at the other end of the edge.
    pub to: usize,
    /// Edge cost.
    pub cost: i64,
    /// Ordering hint for the local search.
    pub priority: u32,
}

impl CandidateEdge {
    pub fn is_forced(&self) -> bool {
        self.priority == FORCED_PRIORITY
    }
}

/// Candidate edges consulted by the local-search engine, one list per node.
///
/// Every list is kept ordered by descending priority, so forced edges always
/// come first, in the order they were forced.
///
/// # Examples
///
/// ```
/// use u_tsp::models::{Instance, Point};
/// use u_tsp::candidates::CandidateSet;
///
/// let points: Vec<Point> = (0..6).map(|i| Point::new(i as f64, 0.0)).collect();
/// let instance = Instance::from_points("line", &points).unwrap();
///
/// let set = CandidateSet::nearest_neighbors(&instance, 2);
/// let first: Vec<usize> = set.neighbors(0).iter().map(|e| e.to).collect();
/// assert_eq!(first, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    lists: Vec<Vec<CandidateEdge>>,
}

impl CandidateSet {
    /// Default number of nearest-neighbor candidates per node.
    pub const DEFAULT_SIZE: usize = 5;

    /// Creates a set with empty lists for `dimension` nodes.
    pub fn empty(dimension: usize) -> Self {
        Self {
            lists: vec![Vec::new(); dimension],
        }
    }

    /// Builds the initial candidate structure: the `k` nearest neighbors of
    /// every node, nearest first.
    pub fn nearest_neighbors(instance: &Instance, k: usize) -> Self {
        let n = instance.dimension();
        let lists = (0..n)
            .map(|from| {
                let near = instance.distances().nearest_neighbors(from, k);
                let len = near.len() as u32;
                near.into_iter()
                    .enumerate()
                    .map(|(rank, to)| CandidateEdge {
                        to,
                        cost: instance.cost(from, to),
                        priority: len - rank as u32,
                    })
                    .collect()
            })
            .collect();
        Self { lists }
    }

    /// Number of nodes covered.
    pub fn dimension(&self) -> usize {
        self.lists.len()
    }

    /// Candidate edges leaving `node`, highest priority first.
    pub fn neighbors(&self, node: usize) -> &[CandidateEdge] {
        &self.lists[node]
    }

    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.lists[from].iter().any(|e| e.to == to)
    }

    pub fn is_forced(&self, from: usize, to: usize) -> bool {
        self.lists[from]
            .iter()
            .any(|e| e.to == to && e.is_forced())
    }

    /// Number of forced directed edges.
    pub fn forced_count(&self) -> usize {
        self.lists
            .iter()
            .map(|l| l.iter().filter(|e| e.is_forced()).count())
            .sum()
    }

    /// Inserts or upgrades the directed edge `from → to`.
    ///
    /// Returns `true` if the set changed. Re-adding an edge with a priority
    /// no higher than its current one is a no-op.
    pub fn add(&mut self, from: usize, to: usize, cost: i64, priority: u32) -> bool {
        let list = &mut self.lists[from];
        if let Some(pos) = list.iter().position(|e| e.to == to) {
            if list[pos].priority >= priority {
                return false;
            }
            list.remove(pos);
        }
        // After every edge of equal or higher priority.
        let at = list.partition_point(|e| e.priority >= priority);
        list.insert(at, CandidateEdge { to, cost, priority });
        true
    }
}
