//! Per-run cost and time statistics.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::models::Cost;

/// Aggregates over every completed iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStatistics {
    pub runs: usize,
    /// Iterations whose cost reached the optimum held at that time.
    pub hits: usize,
    pub cost_min: Option<Cost>,
    pub cost_max: Option<Cost>,
    #[serde(skip)]
    cost_sum: i128,
    pub time_min: Option<Duration>,
    pub time_max: Option<Duration>,
    pub time_total: Duration,
}

impl RunStatistics {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one iteration; it is a hit when `cost` reached `optimum`.
    pub fn update(&mut self, cost: Cost, elapsed: Duration, optimum: Cost) {
        self.runs += 1;
        if cost <= optimum {
            self.hits += 1;
        }
        self.cost_min = Some(self.cost_min.map_or(cost, |c| c.min(cost)));
        self.cost_max = Some(self.cost_max.map_or(cost, |c| c.max(cost)));
        self.cost_sum += i128::from(cost.value());
        self.time_min = Some(self.time_min.map_or(elapsed, |t| t.min(elapsed)));
        self.time_max = Some(self.time_max.map_or(elapsed, |t| t.max(elapsed)));
        self.time_total += elapsed;
    }

    /// Mean cost, `None` before the first iteration.
    pub fn cost_avg(&self) -> Option<f64> {
        (self.runs > 0).then(|| self.cost_sum as f64 / self.runs as f64)
    }

    /// Mean iteration time, `None` before the first iteration.
    pub fn time_avg(&self) -> Option<Duration> {
        (self.runs > 0).then(|| self.time_total.div_f64(self.runs as f64))
    }

    /// Logs the summary at `info` level.
    pub fn log(&self, optimum: Cost) {
        let (Some(min), Some(max), Some(avg)) = (self.cost_min, self.cost_max, self.cost_avg())
        else {
            info!("Successes/Runs = 0/0");
            return;
        };
        info!("Successes/Runs = {}/{}", self.hits, self.runs);
        match (min.gap_percent(optimum), max.gap_percent(optimum)) {
            (Some(gmin), Some(gmax)) => info!(
                "Cost.min = {min}, Cost.avg = {avg:.2}, Cost.max = {max}, \
                 Gap.min = {gmin:.4}%, Gap.max = {gmax:.4}%"
            ),
            _ => info!("Cost.min = {min}, Cost.avg = {avg:.2}, Cost.max = {max}"),
        }
        if let (Some(tmin), Some(tavg), Some(tmax)) = (self.time_min, self.time_avg(), self.time_max)
        {
            info!(
                "Time.min = {:.2} sec., Time.avg = {:.2} sec., Time.max = {:.2} sec., Time.total = {:.2} sec.",
                tmin.as_secs_f64(),
                tavg.as_secs_f64(),
                tmax.as_secs_f64(),
                self.time_total.as_secs_f64()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_statistics() {
        let stats = RunStatistics::new();
        assert_eq!(stats.runs, 0);
        assert_eq!(stats.cost_avg(), None);
        assert_eq!(stats.time_avg(), None);
        stats.log(Cost::MINUS_INFINITY);
    }

    #[test]
    fn test_time_avg_beyond_u32_runs() {
        let runs = u32::MAX as usize + 1;
        let stats = RunStatistics {
            runs,
            time_total: Duration::from_secs(runs as u64),
            ..RunStatistics::default()
        };
        assert_eq!(stats.time_avg(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_update_aggregates() {
        let mut stats = RunStatistics::new();
        stats.update(Cost::new(120), Duration::from_secs(2), Cost::new(100));
        stats.update(Cost::new(100), Duration::from_secs(4), Cost::new(100));
        stats.update(Cost::new(110), Duration::from_secs(3), Cost::new(100));
        assert_eq!(stats.runs, 3);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.cost_min, Some(Cost::new(100)));
        assert_eq!(stats.cost_max, Some(Cost::new(120)));
        assert_eq!(stats.cost_avg(), Some(110.0));
        assert_eq!(stats.time_min, Some(Duration::from_secs(2)));
        assert_eq!(stats.time_max, Some(Duration::from_secs(4)));
        assert_eq!(stats.time_avg(), Some(Duration::from_secs(3)));
        stats.log(Cost::new(100));
    }

    #[test]
    fn test_unknown_optimum_never_hits() {
        let mut stats = RunStatistics::new();
        stats.update(Cost::new(5), Duration::ZERO, Cost::MINUS_INFINITY);
        assert_eq!(stats.hits, 0);
    }
}
