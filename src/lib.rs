//! # u-tsp
//!
//! Multi-trial metaheuristic for the traveling salesman problem family:
//! repeated local-search trials, a steady-state elite population, tour
//! merging and crossover whose children are forced into the candidate set.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Cost, Point, Instance, LowerBound)
//! - [`distance`] — Integer distance matrix
//! - [`tour`] — Successor/predecessor tour store with snapshots
//! - [`candidates`] — Candidate edge lists and forced-edge augmentation
//! - [`constructive`] — Start tours (Nearest Neighbor)
//! - [`local_search`] — Trial engine (2-opt, Or-opt, double-bridge kicks)
//! - [`population`] — Bounded fitness-sorted population, rank selection
//! - [`recombination`] — Tour merging (partition, segment transcription) and ERX
//! - [`controller`] — The run loop, configuration, telemetry and persistence
//!
//! ## Example
//!
//! ```
//! use u_tsp::controller::{RunConfig, RunController};
//! use u_tsp::models::{Instance, Point};
//!
//! let points: Vec<Point> = (0..20)
//!     .map(|i| Point::new((i * 37 % 101) as f64, (i * 59 % 103) as f64))
//!     .collect();
//! let instance = Instance::from_points("demo", &points).unwrap();
//!
//! let config = RunConfig::default().with_runs(5).with_max_population_size(3);
//! let report = RunController::new(instance, config).unwrap().run().unwrap();
//! assert!(report.best_cost.is_finite());
//! ```

pub mod candidates;
pub mod constructive;
pub mod controller;
pub mod distance;
pub mod error;
pub mod local_search;
pub mod models;
pub mod population;
pub mod recombination;
pub mod tour;

pub use error::{Result, SolverError};
