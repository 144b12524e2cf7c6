//! Runs the simulation once per fleet size and collects the endurance of each.

use std::{cell::RefCell, rc::Rc};

use log::info;

use crate::config::SimulationConfig;
use crate::core::fleet::Fleet;
use crate::core::placement::solver::PlacementSolver;
use crate::error::SimulationError;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::records::SlotRecord;
use crate::scenario::Scenario;
use crate::simulator::{FleetSimulation, RunSummary};

pub struct SweepResult {
    pub summary: RunSummary,
    pub metrics: Rc<RefCell<MetricsCollector>>,
    pub records: Vec<SlotRecord>,
}

/// Simulates `fleet` until it is exhausted.
pub fn run_fleet(
    config: Rc<SimulationConfig>,
    scenario: Rc<Scenario>,
    fleet: Fleet,
    solver: &dyn PlacementSolver,
) -> Result<SweepResult, SimulationError> {
    let mut sim = FleetSimulation::new(config, scenario, fleet)?;
    let summary = sim.run(solver)?;
    let metrics = sim.metrics_collector.clone();
    Ok(SweepResult {
        summary,
        metrics,
        records: sim.into_records(),
    })
}

/// Runs homogeneous fleets of every size in the configured range. Runs share nothing: each one
/// gets a fresh fleet, a generator seeded with the configured seed and its own metrics.
/// The first failing run aborts the sweep.
pub fn run_fleet_sweep(
    config: Rc<SimulationConfig>,
    scenario: Rc<Scenario>,
    solver: &dyn PlacementSolver,
) -> Result<Vec<SweepResult>, SimulationError> {
    config.validate()?;
    let sweep = &config.fleet_sweep;
    info!(
        "Sweeping fleet sizes {}..={}",
        sweep.min_fleet_size, sweep.max_fleet_size
    );

    let mut results = Vec::with_capacity(sweep.max_fleet_size + 1 - sweep.min_fleet_size);
    for fleet_size in sweep.min_fleet_size..=sweep.max_fleet_size {
        let fleet = Fleet::homogeneous(&sweep.uav_template, fleet_size);
        let result = run_fleet(config.clone(), scenario.clone(), fleet, solver)?;
        info!(
            "Fleet size {}: endurance {} slots ({:?})",
            fleet_size, result.summary.endurance, result.summary.termination
        );
        results.push(result);
    }
    Ok(results)
}
