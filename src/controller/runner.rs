//! The multi-trial run loop.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::config::RunConfig;
use super::sink::{NullSink, TourIdentity, TourSink};
use super::state::{RunState, StopReason};
use super::statistics::RunStatistics;
use crate::candidates::{augment_from_tour, CandidateSet};
use crate::error::{Result, SolverError};
use crate::local_search::{LocalSearch, SearchContext, TwoOptEngine};
use crate::models::{Cost, Instance, LowerBound};
use crate::population::Population;
use crate::recombination::{Crossover, EdgeRecombination, TourMerger};
use crate::tour::TourStore;

/// One completed iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    pub run: usize,
    /// Trial cost after merging.
    pub cost: Cost,
    pub elapsed: Duration,
    pub improved_best: bool,
    pub new_optimum: bool,
    /// Whether a crossover followed this iteration.
    pub recombined: bool,
}

/// Outcome of [`RunController::run`].
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub completed_runs: usize,
    pub stop_reason: StopReason,
    pub best_cost: Cost,
    /// Best tour as a visiting order from node 0.
    pub best_tour: Option<Vec<usize>>,
    pub optimum: Cost,
    pub iterations: Vec<IterationRecord>,
    pub statistics: RunStatistics,
    /// Final population fitnesses, ascending.
    pub population: Vec<Cost>,
}

impl RunReport {
    /// Iteration costs in run order.
    pub fn costs(&self) -> Vec<Cost> {
        self.iterations.iter().map(|it| it.cost).collect()
    }
}

/// Drives repeated local-search trials, folds them into an elite population
/// or the best tour, and feeds crossover children back into the candidate
/// set.
///
/// Collaborators default to [`TwoOptEngine`], the merger selected by
/// [`RunConfig::recombination`], [`EdgeRecombination`], [`NullSink`] and
/// [`SystemClock`].
///
/// # Examples
///
/// ```
/// use u_tsp::controller::{RunConfig, RunController, StopReason};
/// use u_tsp::models::{Instance, Point};
///
/// let points: Vec<Point> = (0..12)
///     .map(|i| {
///         let a = i as f64 / 12.0 * std::f64::consts::TAU;
///         Point::new(100.0 * a.cos(), 100.0 * a.sin())
///     })
///     .collect();
/// let inst = Instance::from_points("ring12", &points).unwrap();
/// let config = RunConfig::default().with_runs(4).with_max_population_size(3);
///
/// let report = RunController::new(inst, config).unwrap().run().unwrap();
/// assert_eq!(report.completed_runs, 4);
/// assert_eq!(report.stop_reason, StopReason::Exhausted);
/// assert!(report.best_tour.is_some());
/// ```
pub struct RunController {
    instance: Instance,
    config: RunConfig,
    candidates: CandidateSet,
    tour: TourStore,
    population: Population,
    lower_bound: Option<LowerBound>,
    engine: Box<dyn LocalSearch>,
    merger: Box<dyn TourMerger>,
    crossover: Box<dyn Crossover>,
    sink: Box<dyn TourSink>,
    clock: Box<dyn Clock>,
}

impl RunController {
    /// Validates `config` and builds the initial candidate set.
    pub fn new(instance: Instance, config: RunConfig) -> Result<Self> {
        config.validate()?;
        let candidates = CandidateSet::nearest_neighbors(&instance, config.max_candidates);
        let tour = TourStore::new(instance.dimension());
        let population = Population::new(config.max_population_size);
        let merger = config.recombination.merger();
        Ok(Self {
            instance,
            config,
            candidates,
            tour,
            population,
            lower_bound: None,
            engine: Box::new(TwoOptEngine::new()),
            merger,
            crossover: Box::new(EdgeRecombination),
            sink: Box::new(NullSink),
            clock: Box::new(SystemClock::new()),
        })
    }

    /// Replaces the trial engine.
    pub fn with_engine(mut self, engine: impl LocalSearch + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Replaces the merger chosen from [`RunConfig::recombination`].
    pub fn with_merger(mut self, merger: impl TourMerger + 'static) -> Self {
        self.merger = Box::new(merger);
        self
    }

    /// Replaces the crossover used once the population is ready.
    pub fn with_crossover(mut self, crossover: impl Crossover + 'static) -> Self {
        self.crossover = Box::new(crossover);
        self
    }

    /// Sets where new best tours are recorded and written.
    pub fn with_sink(mut self, sink: impl TourSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Sets the time source for the wall-time budget.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Supplies a lower bound; a solved bound skips every trial.
    pub fn with_lower_bound(mut self, bound: LowerBound) -> Self {
        self.lower_bound = Some(bound);
        self
    }

    /// Replaces the initial candidate set.
    pub fn with_candidates(mut self, candidates: CandidateSet) -> Result<Self> {
        if candidates.dimension() != self.instance.dimension() {
            return Err(SolverError::DimensionMismatch {
                expected: self.instance.dimension(),
                actual: candidates.dimension(),
            });
        }
        self.candidates = candidates;
        Ok(self)
    }

    /// Starts from a given tour and tracks changes against it whenever the
    /// optimum improves.
    pub fn with_input_tour(mut self, order: &[usize]) -> Result<Self> {
        self.tour.set_order(order)?;
        self.tour.record_input_tour();
        Ok(self)
    }

    /// The problem being solved.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Current candidate set, including forced edges.
    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// The tour store with its snapshots.
    pub fn tour(&self) -> &TourStore {
        &self.tour
    }

    /// The elite population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Runs the loop until the budget, the time limit or convergence stops it.
    ///
    /// Every new best tour is handed to the sink immediately. Any collaborator
    /// error aborts the loop and is returned unchanged.
    pub fn run(&mut self) -> Result<RunReport> {
        let started = self.clock.now();
        let time_limit = self.config.time_limit();
        let mut state = RunState::new(&self.config);
        let mut stats = RunStatistics::new();
        let mut iterations = Vec::new();

        info!(
            instance = self.instance.name(),
            dimension = self.instance.dimension(),
            runs = self.config.runs,
            population = self.config.max_population_size,
            recombination = %self.config.recombination,
            "starting run"
        );

        if let Some(bound) = self.lower_bound {
            if bound.solved {
                info!("Lower bound = {} is tight", bound.cost);
                state.tracker.settle(bound.cost);
                stats.update(
                    bound.cost,
                    self.clock.now().saturating_sub(started),
                    bound.cost,
                );
                self.tour.set_current_cost(bound.cost);
                self.tour.snapshot_as_best();
                self.persist_best(bound.cost)?;
                state.runs = 0;
                state.stop(StopReason::Solved);
            } else {
                info!("Lower bound = {}", bound.cost);
            }
        }

        if state.stop_reason().is_none() {
            state.start();
        }

        let mut run = 1;
        while run <= state.runs {
            let iteration_started = self.clock.now();
            if let Some(limit) = time_limit {
                if iteration_started.saturating_sub(started) >= limit {
                    warn!("*** Time limit exceeded ***");
                    state.runs = run - 1;
                    state.stop(StopReason::TimeExpired);
                    break;
                }
            }
            state.run = run;

            let mut cost = self.engine.find_tour(SearchContext {
                instance: &self.instance,
                candidates: &self.candidates,
                tour: &mut self.tour,
                rng: &mut state.rng,
            })?;
            self.tour.set_current_cost(cost);

            if self.config.population_mode() {
                cost = self.merge_with_population(cost, &state)?;
                self.offer_to_population(cost);
            } else if run > 1 {
                cost = self.merge_with_best(cost)?;
            }

            let improved_best = state.tracker.offer_best(cost);
            if improved_best {
                self.tour.snapshot_as_best();
                self.persist_best(cost)?;
            }

            let new_optimum = state.tracker.offer_optimum(cost);
            if new_optimum {
                let changed = self.tour.detect_change_since_last_optimum();
                info!(tour_changed = changed, "*** New optimum = {} ***", cost);
            }

            let elapsed = self.clock.now().saturating_sub(iteration_started);
            stats.update(cost, elapsed, state.tracker.optimum());
            if cost != Cost::PLUS_INFINITY {
                info!("{}", state.tracker.run_line(run, cost, elapsed));
            }

            let mut record = IterationRecord {
                run,
                cost,
                elapsed,
                improved_best,
                new_optimum,
                recombined: false,
            };

            if self.config.stop_at_optimum
                && cost == state.tracker.previous_optimum()
                && self.config.max_population_size >= 1
            {
                iterations.push(record);
                state.runs = run;
                state.stop(StopReason::Converged);
                break;
            }

            if self.crossover_due(run, state.runs) {
                self.recombine(&mut state)?;
                record.recombined = true;
            }
            iterations.push(record);

            state.reseed();
            run += 1;
        }

        state.finish();
        stats.log(state.tracker.optimum());

        let stop_reason = state.stop_reason().unwrap_or(StopReason::Exhausted);
        info!(
            completed = state.runs,
            reason = ?stop_reason,
            best = %state.tracker.best_cost(),
            "run finished"
        );

        Ok(RunReport {
            completed_runs: state.runs,
            stop_reason,
            best_cost: state.tracker.best_cost(),
            best_tour: self.tour.best_order(),
            optimum: state.tracker.optimum(),
            iterations,
            statistics: stats,
            population: self.population.fitnesses(),
        })
    }

    /// Folds the live tour with every member in population order.
    fn merge_with_population(&mut self, mut cost: Cost, state: &RunState) -> Result<Cost> {
        for i in 0..self.population.len() {
            let Some(member) = self.population.get(i) else {
                break;
            };
            let before = cost;
            cost = self
                .merger
                .merge(&self.instance, &mut self.tour, cost, member.successors())?;
            if cost > before {
                return Err(SolverError::Engine(format!(
                    "merge raised the cost from {before} to {cost}"
                )));
            }
            if cost < before {
                debug!("{}", state.tracker.merge_line(i + 1, cost));
            }
        }
        self.tour.set_current_cost(cost);
        Ok(cost)
    }

    fn merge_with_best(&mut self, cost: Cost) -> Result<Cost> {
        let Some(best) = self.tour.best_successors().map(<[usize]>::to_vec) else {
            return Ok(cost);
        };
        let merged = self
            .merger
            .merge(&self.instance, &mut self.tour, cost, &best)?;
        if merged > cost {
            return Err(SolverError::Engine(format!(
                "merge raised the cost from {cost} to {merged}"
            )));
        }
        self.tour.set_current_cost(merged);
        Ok(merged)
    }

    /// Inserts or replaces unless a member already has this fitness.
    fn offer_to_population(&mut self, cost: Cost) {
        if self.population.has_fitness(cost) {
            debug!(cost = %cost, "duplicate fitness, trial not kept");
            return;
        }
        let successors = self.tour.successors().to_vec();
        let kept = if !self.population.is_full() {
            self.population.add(cost, successors).is_ok()
        } else if let Some(index) =
            self.population
                .replacement_index(cost, &successors, self.config.replacement)
        {
            self.population.replace(index, cost, successors).is_ok()
        } else {
            false
        };
        if kept {
            debug!("Population:\n{}", self.population.describe());
        }
    }

    fn crossover_due(&self, run: usize, runs: usize) -> bool {
        let size = self.population.len();
        size >= 2
            && (size == self.config.max_population_size
                || run >= self.config.max_population_size.saturating_mul(2))
            && run < runs
    }

    /// Crosses two ranked parents into the live tour and forces its edges
    /// into the candidate set.
    fn recombine(&mut self, state: &mut RunState) -> Result<()> {
        let Some((first, second)) = self
            .population
            .select_parents(self.config.selection_bias, &mut state.rng)
        else {
            return Ok(());
        };
        debug!(first = first + 1, second = second + 1, "crossover");

        let (Some(a), Some(b)) = (self.population.get(first), self.population.get(second)) else {
            return Err(SolverError::IndexOutOfRange {
                index: first.max(second),
                size: self.population.len(),
            });
        };
        self.crossover.crossover(
            &self.instance,
            a.successors(),
            b.successors(),
            &mut self.tour,
            &mut state.rng,
        )?;

        let forced = augment_from_tour(&mut self.candidates, &self.instance, &mut self.tour);
        debug!(forced, "candidate set augmented");
        Ok(())
    }

    fn persist_best(&mut self, cost: Cost) -> Result<()> {
        let order = self.tour.best_order().unwrap_or_else(|| self.tour.order());
        self.sink.record_better_tour(&order, cost)?;
        self.sink.record_best_tour(&order, cost)?;
        self.sink
            .write_tour(TourIdentity::Output, &self.instance, &order, cost)?;
        self.sink
            .write_tour(TourIdentity::Working, &self.instance, &order, cost)?;
        Ok(())
    }
}
