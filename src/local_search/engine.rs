//! The local-search trial contract and the built-in engine.

use rand::rngs::StdRng;
use rand::Rng;

use super::or_opt::or_opt_improve;
use super::two_opt::two_opt_improve;
use crate::candidates::CandidateSet;
use crate::constructive::nearest_neighbor_tour;
use crate::error::{Result, SolverError};
use crate::models::{Cost, Instance};
use crate::tour::{TourStore, Walk, FIRST_NODE};

/// Everything one trial may read or mutate.
///
/// The engine replaces the live tour in `tour` and draws all randomness from
/// `rng`, which the controller reseeds between trials.
pub struct SearchContext<'a> {
    pub instance: &'a Instance,
    pub candidates: &'a CandidateSet,
    pub tour: &'a mut TourStore,
    pub rng: &'a mut StdRng,
}

/// One independent local-search trial.
///
/// Implementations leave their result in the live tour and return its cost.
/// An `Err` aborts the whole run.
pub trait LocalSearch {
    fn find_tour(&mut self, ctx: SearchContext<'_>) -> Result<Cost>;
}

/// Kick-and-descend engine built from 2-opt and Or-opt.
///
/// Each trial starts from the tour recorded by the last candidate
/// augmentation, or else from the best tour, or else from the input tour,
/// perturbed by a double-bridge kick. Without any of these it builds a tour
/// with the nearest-neighbor heuristic from a random start node. The start tour is then improved with
/// candidate-restricted 2-opt and Or-opt until neither finds a move.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tsp::candidates::CandidateSet;
/// use u_tsp::local_search::{LocalSearch, SearchContext, TwoOptEngine};
/// use u_tsp::models::{Instance, Point};
/// use u_tsp::tour::TourStore;
///
/// let points: Vec<Point> = (0..10)
///     .map(|i| Point::new((i * 7 % 10) as f64 * 10.0, (i * 3 % 5) as f64 * 10.0))
///     .collect();
/// let inst = Instance::from_points("demo", &points).unwrap();
/// let cands = CandidateSet::nearest_neighbors(&inst, 5);
/// let mut tour = TourStore::new(inst.dimension());
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let mut engine = TwoOptEngine::new();
/// let cost = engine
///     .find_tour(SearchContext {
///         instance: &inst,
///         candidates: &cands,
///         tour: &mut tour,
///         rng: &mut rng,
///     })
///     .unwrap();
/// assert_eq!(cost, tour.length(inst.distances()));
/// ```
#[derive(Debug, Clone)]
pub struct TwoOptEngine {
    use_or_opt: bool,
}

impl TwoOptEngine {
    pub fn new() -> Self {
        Self { use_or_opt: true }
    }

    /// Disables the Or-opt phase (2-opt only).
    pub fn without_or_opt(mut self) -> Self {
        self.use_or_opt = false;
        self
    }

    fn start_tour(&self, ctx: &mut SearchContext<'_>) -> Vec<usize> {
        let seed_tour: Option<Vec<usize>> = ctx
            .tour
            .initial_successors()
            .or_else(|| ctx.tour.best_successors())
            .or_else(|| ctx.tour.input_successors())
            .map(|succ| Walk::new(succ, FIRST_NODE).collect());

        match seed_tour {
            Some(mut order) => {
                double_bridge(&mut order, &mut *ctx.rng);
                order
            }
            None => {
                let n = ctx.instance.dimension();
                let start = ctx.rng.random_range(0..n as u64) as usize;
                nearest_neighbor_tour(ctx.instance.distances(), start)
            }
        }
    }
}

impl Default for TwoOptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TwoOptEngine {
    fn find_tour(&mut self, mut ctx: SearchContext<'_>) -> Result<Cost> {
        let n = ctx.instance.dimension();
        if ctx.tour.len() != n || ctx.candidates.dimension() != n {
            return Err(SolverError::Engine(format!(
                "instance has {n} nodes but tour has {} and candidate set {}",
                ctx.tour.len(),
                ctx.candidates.dimension()
            )));
        }

        let start = self.start_tour(&mut ctx);
        let distances = ctx.instance.distances();
        let (mut order, mut cost) = two_opt_improve(&start, distances, ctx.candidates);

        if self.use_or_opt {
            loop {
                let (moved, moved_cost) = or_opt_improve(&order, distances, ctx.candidates);
                if moved_cost >= cost {
                    break;
                }
                let (next, next_cost) = two_opt_improve(&moved, distances, ctx.candidates);
                order = next;
                cost = next_cost;
            }
        }

        ctx.tour.set_order(&order)?;
        Ok(cost)
    }
}

/// Double-bridge kick: `A B C D` becomes `A C B D`.
///
/// Tours shorter than 8 nodes get a random swap of two positions instead.
fn double_bridge<R: Rng>(order: &mut Vec<usize>, rng: &mut R) {
    let n = order.len();
    if n < 2 {
        return;
    }
    if n < 8 {
        let i = rng.random_range(0..n as u64) as usize;
        let j = rng.random_range(0..n as u64) as usize;
        order.swap(i, j);
        return;
    }

    let p1 = 1 + rng.random_range(0..(n - 3) as u64) as usize;
    let p2 = p1 + 1 + rng.random_range(0..(n - p1 - 2) as u64) as usize;
    let p3 = p2 + 1 + rng.random_range(0..(n - p2 - 1) as u64) as usize;

    let mut kicked = Vec::with_capacity(n);
    kicked.extend_from_slice(&order[..p1]);
    kicked.extend_from_slice(&order[p2..p3]);
    kicked.extend_from_slice(&order[p1..p2]);
    kicked.extend_from_slice(&order[p3..]);
    *order = kicked;
}
