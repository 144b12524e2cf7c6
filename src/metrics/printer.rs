use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write};

use crate::error::SimulationError;
use crate::metrics::collector::MetricStats;
use crate::sweep::SweepResult;

#[derive(Debug, Default, Deserialize, PartialEq)]
pub enum OutputFormat {
    #[default]
    JSON,
    PrettyTable,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct MetricsPrinterConfig {
    pub format: OutputFormat,
    pub output_file: std::path::PathBuf,
}

pub fn print_metrics(
    results: &[SweepResult],
    config: &MetricsPrinterConfig,
) -> Result<(), SimulationError> {
    let mut metrics_file = File::create(&config.output_file)?;
    match config.format {
        OutputFormat::PrettyTable => print_metrics_as_pretty_table(results, &mut metrics_file),
        OutputFormat::JSON => print_metrics_as_json(results, &mut metrics_file),
    }
}

pub fn endurance_table(results: &[SweepResult]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "Fleet size",
        "Endurance (slots)",
        "Termination",
        "Mean solve time (s)",
        "Mean min battery (Wh)"
    ]);
    for result in results {
        let metrics = result.metrics.borrow();
        table.add_row(row![
            result.summary.fleet_size,
            result.summary.endurance,
            format!("{:?}", result.summary.termination),
            format!("{:.4}", metrics.solve_time_stats.mean()),
            format!("{:.3}", metrics.min_battery_stats.mean())
        ]);
    }
    table
}

pub fn print_metrics_as_pretty_table<W: Write>(
    results: &[SweepResult],
    out: &mut W,
) -> Result<(), SimulationError> {
    endurance_table(results).print(out)?;

    let mut stats_table = Table::new();
    stats_table.add_row(row!["Fleet size", "Metric", "Min", "Max", "Mean", "Variance"]);
    for result in results {
        let metrics = result.metrics.borrow();
        let fleet_size = result.summary.fleet_size;
        stats_table.add_row(row![
            fleet_size,
            "Fleet energy per slot",
            metrics.fleet_energy_stats.min(),
            metrics.fleet_energy_stats.max(),
            metrics.fleet_energy_stats.mean(),
            metrics.fleet_energy_stats.population_variance()
        ]);
        stats_table.add_row(row![
            fleet_size,
            "Min battery after slot",
            metrics.min_battery_stats.min(),
            metrics.min_battery_stats.max(),
            metrics.min_battery_stats.mean(),
            metrics.min_battery_stats.population_variance()
        ]);
        stats_table.add_row(row![
            fleet_size,
            "Solve time",
            metrics.solve_time_stats.min(),
            metrics.solve_time_stats.max(),
            metrics.solve_time_stats.mean(),
            metrics.solve_time_stats.population_variance()
        ]);
    }
    stats_table.print(out)?;
    Ok(())
}

#[derive(Serialize)]
struct MetricsJSON {
    runs: Vec<RunJSON>,
}

#[derive(Serialize)]
struct RunJSON {
    fleet_size: usize,
    endurance: u64,
    termination: String,
    counters: Counters,
    stats: Stats,
}

#[derive(Serialize)]
struct Counters {
    slots_applied: u64,
    solver_calls: u64,
}

#[derive(Serialize)]
struct Stats {
    fleet_energy: EstimatorStats,
    min_battery: EstimatorStats,
    fairness: EstimatorStats,
    solve_time: EstimatorStats,
}

#[derive(Serialize)]
struct EstimatorStats {
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
}

impl From<&MetricStats> for EstimatorStats {
    fn from(estimator: &MetricStats) -> Self {
        Self {
            min: estimator.min(),
            max: estimator.max(),
            mean: estimator.mean(),
            variance: estimator.population_variance(),
        }
    }
}

pub fn print_metrics_as_json<W: Write>(
    results: &[SweepResult],
    out: &mut W,
) -> Result<(), SimulationError> {
    let runs = results
        .iter()
        .map(|result| {
            let metrics = result.metrics.borrow();
            RunJSON {
                fleet_size: result.summary.fleet_size,
                endurance: result.summary.endurance,
                termination: format!("{:?}", result.summary.termination),
                counters: Counters {
                    slots_applied: metrics.slots_applied,
                    solver_calls: metrics.solver_calls,
                },
                stats: Stats {
                    fleet_energy: (&metrics.fleet_energy_stats).into(),
                    min_battery: (&metrics.min_battery_stats).into(),
                    fairness: (&metrics.fairness_stats).into(),
                    solve_time: (&metrics.solve_time_stats).into(),
                },
            }
        })
        .collect();

    let serialized_json = serde_json::to_string_pretty(&MetricsJSON { runs })?;
    out.write_all(serialized_json.as_bytes())?;
    Ok(())
}
