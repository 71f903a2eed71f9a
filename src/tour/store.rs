//! Live tour with historical successor snapshots.

use super::walk::Walk;
use crate::distance::DistanceMatrix;
use crate::error::{Result, SolverError};
use crate::models::Cost;

/// Node every traversal of the live tour starts from.
pub const FIRST_NODE: usize = 0;

/// The live Hamiltonian cycle over a fixed node set.
///
/// Nodes are addressed by index; successor and predecessor links are kept in
/// parallel arrays so every local query is O(1). Outside of a mutation,
/// `pred[suc[v]] == v` holds for every node and following successors from
/// any node returns to it after exactly `len()` steps.
///
/// Besides the live tour the store keeps three snapshots:
///
/// - the best tour found so far,
/// - `InputSuc`: successors recorded at the last detected improvement of the
///   optimum (only tracked once seeded by [`record_input_tour`](Self::record_input_tour)),
/// - `InitialSuc`: successors recorded after the last candidate augmentation.
///
/// # Examples
///
/// ```
/// use u_tsp::tour::TourStore;
///
/// let mut tour = TourStore::from_order(&[0, 2, 1, 3]).unwrap();
/// assert_eq!(tour.suc(0), 2);
/// assert_eq!(tour.pred(0), 3);
///
/// tour.snapshot_as_best();
/// assert_eq!(tour.best_order(), Some(vec![0, 2, 1, 3]));
/// ```
#[derive(Debug, Clone)]
pub struct TourStore {
    suc: Vec<usize>,
    pred: Vec<usize>,
    cost: Cost,
    best: Option<Vec<usize>>,
    input_suc: Option<Vec<usize>>,
    initial_suc: Option<Vec<usize>>,
}

impl TourStore {
    /// Creates the identity tour `0 → 1 → … → n-1 → 0`.
    pub fn new(dimension: usize) -> Self {
        let suc = (0..dimension).map(|v| (v + 1) % dimension).collect();
        let pred = (0..dimension)
            .map(|v| (v + dimension - 1) % dimension)
            .collect();
        Self {
            suc,
            pred,
            cost: Cost::PLUS_INFINITY,
            best: None,
            input_suc: None,
            initial_suc: None,
        }
    }

    /// Creates a tour visiting nodes in the given order.
    pub fn from_order(order: &[usize]) -> Result<Self> {
        let mut tour = Self::new(order.len());
        tour.set_order(order)?;
        Ok(tour)
    }

    /// Creates a tour from a successor array.
    pub fn from_successors(successors: &[usize]) -> Result<Self> {
        let mut tour = Self::new(successors.len());
        tour.set_successors(successors)?;
        Ok(tour)
    }

    /// Number of nodes in the tour.
    pub fn len(&self) -> usize {
        self.suc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suc.is_empty()
    }

    #[inline]
    pub fn suc(&self, node: usize) -> usize {
        self.suc[node]
    }

    #[inline]
    pub fn pred(&self, node: usize) -> usize {
        self.pred[node]
    }

    pub fn successors(&self) -> &[usize] {
        &self.suc
    }

    /// Replaces the live tour with the given visiting order.
    ///
    /// The order must be a permutation of `0..len()`.
    pub fn set_order(&mut self, order: &[usize]) -> Result<()> {
        let n = self.len();
        if order.len() != n {
            return Err(SolverError::DimensionMismatch {
                expected: n,
                actual: order.len(),
            });
        }
        let mut seen = vec![false; n];
        for &v in order {
            if v >= n || seen[v] {
                return Err(SolverError::InvalidTour(format!(
                    "node {v} is out of range or visited twice"
                )));
            }
            seen[v] = true;
        }
        for i in 0..n {
            let a = order[i];
            let b = order[(i + 1) % n];
            self.suc[a] = b;
            self.pred[b] = a;
        }
        Ok(())
    }

    /// Replaces the live tour with the given successor array.
    ///
    /// The array must describe a single cycle over all nodes.
    pub fn set_successors(&mut self, successors: &[usize]) -> Result<()> {
        validate_successors(successors, self.len())?;
        self.suc.copy_from_slice(successors);
        for (v, &s) in successors.iter().enumerate() {
            self.pred[s] = v;
        }
        Ok(())
    }

    /// Walks the live tour from [`FIRST_NODE`].
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.suc, FIRST_NODE)
    }

    pub fn walk_from(&self, anchor: usize) -> Walk<'_> {
        Walk::new(&self.suc, anchor)
    }

    /// Visiting order starting from [`FIRST_NODE`].
    pub fn order(&self) -> Vec<usize> {
        self.walk().collect()
    }

    /// Sums the edge costs of the live tour.
    pub fn length(&self, distances: &DistanceMatrix) -> Cost {
        self.walk()
            .map(|v| Cost::new(distances.get(v, self.suc[v])))
            .sum()
    }

    /// Cost of the live tour as last reported by the local-search engine.
    pub fn current_cost(&self) -> Cost {
        self.cost
    }

    pub fn set_current_cost(&mut self, cost: Cost) {
        self.cost = cost;
    }

    /// Copies the live tour into the best-tour buffer.
    pub fn snapshot_as_best(&mut self) {
        match self.best.as_mut() {
            Some(best) => best.copy_from_slice(&self.suc),
            None => self.best = Some(self.suc.clone()),
        }
    }

    pub fn best_successors(&self) -> Option<&[usize]> {
        self.best.as_deref()
    }

    pub fn best_order(&self) -> Option<Vec<usize>> {
        self.best
            .as_deref()
            .map(|best| Walk::new(best, FIRST_NODE).collect())
    }

    /// Seeds the `InputSuc` snapshot with the live tour.
    ///
    /// Used when the run starts from a user-supplied tour; from then on
    /// [`detect_change_since_last_optimum`](Self::detect_change_since_last_optimum)
    /// keeps the snapshot current.
    pub fn record_input_tour(&mut self) {
        self.input_suc = Some(self.suc.clone());
    }

    pub fn input_successors(&self) -> Option<&[usize]> {
        self.input_suc.as_deref()
    }

    /// Walks the live tour once, reporting whether any successor differs from
    /// the `InputSuc` snapshot, and refreshes the snapshot to the live tour.
    ///
    /// Without a prior snapshot nothing is recorded and `false` is returned.
    pub fn detect_change_since_last_optimum(&mut self) -> bool {
        let Some(input) = self.input_suc.as_mut() else {
            return false;
        };
        let mut changed = false;
        for v in Walk::new(&self.suc, FIRST_NODE) {
            if input[v] != self.suc[v] {
                changed = true;
            }
            input[v] = self.suc[v];
        }
        changed
    }

    /// Records the live tour as the `InitialSuc` snapshot.
    pub fn refresh_initial_tour(&mut self) {
        match self.initial_suc.as_mut() {
            Some(initial) => {
                for v in Walk::new(&self.suc, FIRST_NODE) {
                    initial[v] = self.suc[v];
                }
            }
            None => self.initial_suc = Some(self.suc.clone()),
        }
    }

    pub fn initial_successors(&self) -> Option<&[usize]> {
        self.initial_suc.as_deref()
    }

    /// Number of live-tour edges absent from another tour, ignoring direction.
    pub fn edge_distance(&self, other: &[usize]) -> usize {
        self.walk()
            .filter(|&v| {
                let s = self.suc[v];
                other[v] != s && other[s] != v
            })
            .count()
    }

    /// Checks the successor/predecessor invariant.
    pub fn is_consistent(&self) -> bool {
        validate_successors(&self.suc, self.len()).is_ok()
            && self
                .suc
                .iter()
                .enumerate()
                .all(|(v, &s)| self.pred[s] == v)
    }
}

/// Checks that `successors` is a single cycle over `0..n`.
pub fn validate_successors(successors: &[usize], n: usize) -> Result<()> {
    if successors.len() != n {
        return Err(SolverError::DimensionMismatch {
            expected: n,
            actual: successors.len(),
        });
    }
    if n == 0 {
        return Ok(());
    }
    if let Some(&bad) = successors.iter().find(|&&s| s >= n) {
        return Err(SolverError::InvalidTour(format!(
            "successor {bad} is out of range"
        )));
    }
    let visited = Walk::new(successors, FIRST_NODE).count();
    if visited != n {
        return Err(SolverError::InvalidTour(format!(
            "successor chain closes after {visited} of {n} nodes"
        )));
    }
    let mut cursor = FIRST_NODE;
    for _ in 0..n {
        cursor = successors[cursor];
    }
    if cursor != FIRST_NODE {
        return Err(SolverError::InvalidTour(
            "successor chain does not return to the first node".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity_tour() {
        let tour = TourStore::new(4);
        assert_eq!(tour.order(), vec![0, 1, 2, 3]);
        assert_eq!(tour.pred(0), 3);
        assert!(tour.is_consistent());
        assert_eq!(tour.current_cost(), Cost::PLUS_INFINITY);
    }

    #[test]
    fn test_set_order_rejects_duplicates() {
        let mut tour = TourStore::new(3);
        assert!(tour.set_order(&[0, 1, 1]).is_err());
        assert!(tour.set_order(&[0, 1]).is_err());
        assert!(tour.set_order(&[0, 1, 7]).is_err());
        assert_eq!(tour.order(), vec![0, 1, 2]);
    }

    #[test]
    fn test_set_successors_rejects_subtours() {
        let mut tour = TourStore::new(4);
        // 0 ↔ 1 and 2 ↔ 3
        let err = tour.set_successors(&[1, 0, 3, 2]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidTour(_)));
        // 0 → 1 → 2 → 1: node 3 unreachable and 1 visited twice
        assert!(tour.set_successors(&[1, 2, 1, 0]).is_err());
        assert!(tour.is_consistent());
    }

    #[test]
    fn test_length() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 2);
        dm.set(1, 2, 3);
        dm.set(2, 0, 4);
        let tour = TourStore::new(3);
        assert_eq!(tour.length(&dm), Cost::new(9));
    }

    #[test]
    fn test_snapshot_replaces_prior_best() {
        let mut tour = TourStore::from_order(&[0, 1, 2, 3]).expect("valid");
        tour.snapshot_as_best();
        tour.set_order(&[0, 2, 1, 3]).expect("valid");
        tour.snapshot_as_best();
        assert_eq!(tour.best_order(), Some(vec![0, 2, 1, 3]));
    }

    #[test]
    fn test_detect_change_without_snapshot() {
        let mut tour = TourStore::new(4);
        assert!(!tour.detect_change_since_last_optimum());
        assert!(tour.input_successors().is_none());
    }

    #[test]
    fn test_detect_change_refreshes_snapshot() {
        let mut tour = TourStore::new(4);
        tour.record_input_tour();
        assert!(!tour.detect_change_since_last_optimum());

        tour.set_order(&[0, 2, 1, 3]).expect("valid");
        assert!(tour.detect_change_since_last_optimum());
        assert_eq!(tour.input_successors(), Some(tour.successors()));
        assert!(!tour.detect_change_since_last_optimum());
    }

    #[test]
    fn test_refresh_initial_tour() {
        let mut tour = TourStore::new(4);
        assert!(tour.initial_successors().is_none());
        tour.refresh_initial_tour();
        tour.set_order(&[0, 3, 2, 1]).expect("valid");
        tour.refresh_initial_tour();
        assert_eq!(tour.initial_successors(), Some(&[3, 0, 1, 2][..]));
    }

    #[test]
    fn test_edge_distance_ignores_direction() {
        let tour = TourStore::from_order(&[0, 1, 2, 3, 4]).expect("valid");
        let reversed = TourStore::from_order(&[0, 4, 3, 2, 1]).expect("valid");
        assert_eq!(tour.edge_distance(reversed.successors()), 0);

        let swapped = TourStore::from_order(&[0, 2, 1, 3, 4]).expect("valid");
        assert_eq!(tour.edge_distance(swapped.successors()), 2);
    }

    proptest! {
        #[test]
        fn prop_set_order_keeps_invariant(perm in Just((0..12usize).collect::<Vec<_>>()).prop_shuffle()) {
            let tour = TourStore::from_order(&perm).expect("permutation");
            prop_assert!(tour.is_consistent());
            prop_assert_eq!(tour.walk().count(), 12);
            let from_first: Vec<usize> = tour.walk_from(perm[0]).collect();
            prop_assert_eq!(from_first, perm);
        }
    }
}
