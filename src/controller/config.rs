//! Run configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::candidates::CandidateSet;
use crate::error::{Result, SolverError};
use crate::models::Cost;
use crate::population::ReplacementPolicy;
use crate::recombination::Recombination;

/// Parameters of one multi-trial run.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes.
///
/// # Examples
///
/// ```
/// use u_tsp::controller::RunConfig;
/// use u_tsp::recombination::Recombination;
///
/// let config = RunConfig::from_json_str(r#"{ "runs": 3, "recombination": "GPX2" }"#).unwrap();
/// assert_eq!(config.runs, 3);
/// assert_eq!(config.recombination, Recombination::Gpx2);
/// assert_eq!(config.seed, 1);
///
/// let config = RunConfig::default().with_runs(5).with_max_population_size(4);
/// assert!(config.population_mode());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Run budget.
    pub runs: usize,
    /// Elite population capacity; population mode needs at least 2.
    pub max_population_size: usize,
    /// Wall-time budget in seconds; `None` is unlimited.
    pub total_time_limit: Option<f64>,
    /// Stop once a trial matches the optimum held before it.
    pub stop_at_optimum: bool,
    /// Known optimum; `None` means unknown.
    pub optimum: Option<i64>,
    pub seed: u64,
    pub recombination: Recombination,
    pub replacement: ReplacementPolicy,
    /// Linear-ranking pressure for parent selection, in `(1, 2]`.
    pub selection_bias: f64,
    /// Nearest neighbors per node in the initial candidate set.
    pub max_candidates: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            max_population_size: 0,
            total_time_limit: None,
            stop_at_optimum: true,
            optimum: None,
            seed: 1,
            recombination: Recombination::default(),
            replacement: ReplacementPolicy::default(),
            selection_bias: 1.25,
            max_candidates: CandidateSet::DEFAULT_SIZE,
        }
    }
}

impl RunConfig {
    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Sets the run budget.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the population capacity; 0 or 1 disables population mode.
    pub fn with_max_population_size(mut self, size: usize) -> Self {
        self.max_population_size = size;
        self
    }

    /// Sets the wall-time budget in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.total_time_limit = Some(seconds);
        self
    }

    /// Enables or disables stopping once a trial matches the optimum.
    pub fn with_stop_at_optimum(mut self, stop: bool) -> Self {
        self.stop_at_optimum = stop;
        self
    }

    /// Sets the known optimum.
    pub fn with_optimum(mut self, optimum: i64) -> Self {
        self.optimum = Some(optimum);
        self
    }

    /// Sets the seed of the first iteration.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects the merge strategy.
    pub fn with_recombination(mut self, recombination: Recombination) -> Self {
        self.recombination = recombination;
        self
    }

    /// Selects which member a full population evicts.
    pub fn with_replacement(mut self, replacement: ReplacementPolicy) -> Self {
        self.replacement = replacement;
        self
    }

    /// Sets the linear-ranking pressure for parent selection.
    pub fn with_selection_bias(mut self, bias: f64) -> Self {
        self.selection_bias = bias;
        self
    }

    /// Sets the number of nearest neighbors per node in the candidate set.
    pub fn with_max_candidates(mut self, k: usize) -> Self {
        self.max_candidates = k;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.total_time_limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(SolverError::InvalidConfig(format!(
                    "total_time_limit must be a non-negative number of seconds, got {limit}"
                )));
            }
        }
        if !(self.selection_bias > 1.0 && self.selection_bias <= 2.0) {
            return Err(SolverError::InvalidConfig(format!(
                "selection_bias must be in (1, 2], got {}",
                self.selection_bias
            )));
        }
        if self.max_candidates == 0 {
            return Err(SolverError::InvalidConfig(
                "max_candidates must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// True when trials are folded into an elite population.
    pub fn population_mode(&self) -> bool {
        self.max_population_size > 1
    }

    /// The wall-time budget. A limit too large for [`Duration`] is unlimited.
    pub fn time_limit(&self) -> Option<Duration> {
        self.total_time_limit
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }

    /// The optimum reference, [`Cost::MINUS_INFINITY`] when unknown.
    pub fn optimum_cost(&self) -> Cost {
        self.optimum.map_or(Cost::MINUS_INFINITY, Cost::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.runs, 10);
        assert_eq!(config.max_population_size, 0);
        assert!(config.stop_at_optimum);
        assert_eq!(config.optimum_cost(), Cost::MINUS_INFINITY);
        assert_eq!(config.time_limit(), None);
        assert!(!config.population_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunConfig::from_json_str(
            r#"{ "max_population_size": 5, "total_time_limit": 2.5, "replacement": "closest" }"#,
        )
        .expect("valid");
        assert_eq!(config.max_population_size, 5);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
        assert_eq!(config.replacement, ReplacementPolicy::Closest);
        assert_eq!(config.runs, 10);
    }

    #[rstest]
    #[case(1.0)]
    #[case(0.5)]
    #[case(2.5)]
    #[case(f64::NAN)]
    fn test_rejects_bad_bias(#[case] bias: f64) {
        let config = RunConfig::default().with_selection_bias(bias);
        assert!(matches!(config.validate(), Err(SolverError::InvalidConfig(_))));
    }

    #[rstest]
    #[case(1e20)]
    #[case(f64::MAX)]
    fn test_oversized_time_limit_is_unlimited(#[case] limit: f64) {
        let config = RunConfig::default().with_time_limit(limit);
        assert!(config.validate().is_ok());
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_oversized_time_limit_from_json() {
        let config =
            RunConfig::from_json_str(r#"{ "runs": 2, "total_time_limit": 1e20 }"#).expect("valid");
        assert_eq!(config.time_limit(), None);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn test_rejects_bad_time_limit(#[case] limit: f64) {
        let config = RunConfig::default().with_time_limit(limit);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RunConfig::from_json_str("{ runs: }"),
            Err(SolverError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "runs": 2, "optimum": 7542, "seed": 9 }}"#).expect("write");
        let config = RunConfig::from_json_file(file.path()).expect("load");
        assert_eq!(config.runs, 2);
        assert_eq!(config.optimum_cost(), Cost::new(7542));
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RunConfig::from_json_file("/nonexistent/run.json");
        assert!(matches!(result, Err(SolverError::Io(_))));
    }
}
