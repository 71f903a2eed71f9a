//! Multi-trial run controller.
//!
//! - [`RunController`] — The run loop: trials, merging, population updates,
//!   stopping rules and crossover-driven candidate augmentation
//! - [`RunConfig`] — Serde-backed run parameters
//! - [`OptimumTracker`] — Best cost, optimum reference and gap reporting
//! - [`RunStatistics`] — Cost and time aggregates over the iterations
//! - [`TourSink`] — Persistence hook for every new best tour
//! - [`Clock`] — Time source for the wall-time budget

mod clock;
mod config;
mod runner;
mod sink;
mod state;
mod statistics;
mod telemetry;

pub use clock::{Clock, SystemClock};
pub use config::RunConfig;
pub use runner::{IterationRecord, RunController, RunReport};
pub use sink::{NullSink, TourIdentity, TourSink, TsplibTourWriter};
pub use state::{RunPhase, RunState, StopReason};
pub use statistics::RunStatistics;
pub use telemetry::OptimumTracker;
