//! Implements storage for the metrics of one simulation run. The simulation reports every applied
//! slot here.

use average::{concatenate, Estimate, Max, Mean, Min, Variance};

concatenate!(
    Estimator,
    [Min, min],
    [Max, max],
    [Mean, mean],
    [Variance, population_variance]
);

/// Running statistics of one per-slot quantity. Only the number of samples and the four
/// estimations the printers report are kept.
#[derive(Default)]
pub struct MetricStats {
    estimator: Estimator,
    samples: u64,
}

impl MetricStats {
    pub fn add(&mut self, value: f64) {
        self.estimator.add(value);
        self.samples += 1;
    }

    pub fn count(&self) -> u64 {
        self.samples
    }

    pub fn min(&self) -> f64 {
        self.estimator.min()
    }

    pub fn max(&self) -> f64 {
        self.estimator.max()
    }

    pub fn mean(&self) -> f64 {
        self.estimator.mean()
    }

    pub fn population_variance(&self) -> f64 {
        self.estimator.population_variance()
    }
}

impl std::fmt::Debug for MetricStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricStats")
            .field("samples", &self.samples)
            .field("min", &self.min())
            .field("max", &self.max())
            .field("mean", &self.mean())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// The number of slots whose placement was applied.
    pub slots_applied: u64,
    /// The number of models handed to the solver, including the last infeasible one.
    pub solver_calls: u64,

    /// Estimations for the wall-clock time of a solve in seconds.
    pub solve_time_stats: MetricStats,
    /// Estimations for the energy drawn by the whole fleet in a slot, in Wh.
    pub fleet_energy_stats: MetricStats,
    /// Estimations for the lowest battery in the fleet after a slot, in Wh.
    pub min_battery_stats: MetricStats,
    /// Estimations for the value of the fairness variable.
    pub fairness_stats: MetricStats,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            slots_applied: 0,
            solver_calls: 0,
            solve_time_stats: MetricStats::default(),
            fleet_energy_stats: MetricStats::default(),
            min_battery_stats: MetricStats::default(),
            fairness_stats: MetricStats::default(),
        }
    }

    pub fn increment_solve_time(&mut self, value: f64) {
        self.solve_time_stats.add(value);
    }

    pub fn increment_fleet_energy(&mut self, value: f64) {
        self.fleet_energy_stats.add(value);
    }

    pub fn increment_min_battery(&mut self, value: f64) {
        self.min_battery_stats.add(value);
    }

    pub fn increment_fairness(&mut self, value: f64) {
        self.fairness_stats.add(value);
    }
}
