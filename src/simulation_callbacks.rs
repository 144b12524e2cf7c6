//! Simulation callbacks interface and implementations to define how simulator should behave on start,
//! step, finish and when it should stop running.

use log::{info, warn};

use crate::simulator::FleetSimulation;

pub trait SimulationCallbacks {
    /// Runs before starting a simulation run.
    fn on_simulation_start(&mut self, _sim: &mut FleetSimulation) {}

    /// Runs before each slot, returns false if the simulation must be stopped.
    fn on_step(&mut self, _sim: &mut FleetSimulation) -> bool {
        true
    }

    /// Runs upon the completion of a simulation run.
    fn on_simulation_finish(&mut self, _sim: &mut FleetSimulation) {}
}

fn log_run_result(sim: &FleetSimulation) {
    let metrics = sim.metrics_collector.borrow();
    info!(
        "Fleet of {} uavs: {} slots applied, {} solver calls, lowest battery {:.3} Wh",
        sim.fleet().size(),
        metrics.slots_applied,
        metrics.solver_calls,
        sim.fleet().min_battery()
    );
}

/// Steps until a slot has no feasible placement.
pub struct RunUntilExhaustedCallbacks {}

impl SimulationCallbacks for RunUntilExhaustedCallbacks {
    fn on_simulation_finish(&mut self, sim: &mut FleetSimulation) {
        log_run_result(sim);
    }
}

/// Steps until the fleet is exhausted or `max_slots` slots were applied, whichever comes first.
pub struct RunForSlotsCallbacks {
    max_slots: u64,
}

impl RunForSlotsCallbacks {
    pub fn new(max_slots: u64) -> Self {
        Self { max_slots }
    }
}

impl SimulationCallbacks for RunForSlotsCallbacks {
    fn on_step(&mut self, sim: &mut FleetSimulation) -> bool {
        if sim.endurance() >= self.max_slots {
            warn!(
                "Fleet of {} uavs still feasible after {} slots, stopping",
                sim.fleet().size(),
                self.max_slots
            );
            return false;
        }
        true
    }

    fn on_simulation_finish(&mut self, sim: &mut FleetSimulation) {
        log_run_result(sim);
    }
}
