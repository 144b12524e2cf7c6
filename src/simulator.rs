//! Represents entry point for the fleet simulation: a slot-by-slot loop which places service
//! replicas, drains batteries and stops once no placement keeps the fleet above the floor.

use log::{debug, error, info, trace};
use std::time::Instant;
use std::{cell::RefCell, rc::Rc};

use crate::config::SimulationConfig;
use crate::core::fleet::Fleet;
use crate::core::placement::model::{PlacementProblem, SlotInput};
use crate::core::placement::objective::{objective_policy, ObjectivePolicy};
use crate::core::placement::placement::Placement;
use crate::core::placement::solver::{PlacementSolver, SlotSolution, SolveOutcome};
use crate::core::usage::UavUsage;
use crate::core::workload::{RequestGenerator, RequestTable};
use crate::error::SimulationError;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::records::SlotRecord;
use crate::scenario::Scenario;
use crate::simulation_callbacks::{
    RunForSlotsCallbacks, RunUntilExhaustedCallbacks, SimulationCallbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Fleet and workload are loaded, no model is built.
    Ready,
    /// A slot model is handed to the solver.
    Solving,
    /// The last slot had no feasible placement. Terminal.
    Exhausted,
    /// The solver failed for a reason other than infeasibility. Terminal.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedSlot {
    pub slot: u64,
    pub placement: Placement,
    pub fairness: f64,
    pub objective_value: f64,
    /// Wh drawn by the whole fleet.
    pub fleet_energy: f64,
    /// Lowest battery in the fleet after the slot.
    pub min_battery: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    Applied(AppliedSlot),
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A slot had no feasible placement.
    Exhausted,
    /// The run was stopped by its callbacks before the fleet got exhausted.
    SlotLimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub fleet_size: usize,
    /// Number of slots the fleet sustained.
    pub endurance: u64,
    pub termination: Termination,
}

pub struct FleetSimulation {
    pub config: Rc<SimulationConfig>,
    scenario: Rc<Scenario>,
    objective: &'static dyn ObjectivePolicy,

    fleet: Fleet,
    generator: RequestGenerator,
    requests: RequestTable,

    state: DriverState,
    slots_applied: u64,
    records: Vec<SlotRecord>,

    pub metrics_collector: Rc<RefCell<MetricsCollector>>,
}

impl FleetSimulation {
    pub fn new(
        config: Rc<SimulationConfig>,
        scenario: Rc<Scenario>,
        fleet: Fleet,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        fleet.validate().map_err(SimulationError::InvalidFleet)?;
        let objective = objective_policy(&config.objective).ok_or_else(|| {
            SimulationError::InvalidConfig(format!("unknown objective {:?}", config.objective))
        })?;

        info!(
            "Creating fleet simulation {:?}: {} uavs, {} services ({} replicas), objective {}",
            config.sim_name,
            fleet.size(),
            scenario.catalog.service_count(),
            scenario.catalog.replica_count(),
            objective.name()
        );

        let mut generator = RequestGenerator::new(config.seed);
        let requests = generator.generate(
            fleet.size(),
            scenario.catalog.service_count(),
            scenario.n_requests,
        );

        Ok(Self {
            config,
            scenario,
            objective,
            fleet,
            generator,
            requests,
            state: DriverState::Ready,
            slots_applied: 0,
            records: vec![],
            metrics_collector: Rc::new(RefCell::new(MetricsCollector::new())),
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of slots applied so far. Once exhausted, the endurance of the fleet.
    pub fn endurance(&self) -> u64 {
        self.slots_applied
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Workload of the next slot.
    pub fn requests(&self) -> &RequestTable {
        &self.requests
    }

    pub fn records(&self) -> &[SlotRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SlotRecord> {
        self.records
    }

    /// Builds the model of the next slot, solves it and applies the realized energy draw.
    /// Stepping an exhausted simulation is a no-op.
    pub fn step(&mut self, solver: &dyn PlacementSolver) -> Result<SlotOutcome, SimulationError> {
        match self.state {
            DriverState::Exhausted => return Ok(SlotOutcome::Exhausted),
            DriverState::Failed => return Err(SimulationError::Halted(self.config.sim_name.clone())),
            DriverState::Ready | DriverState::Solving => {}
        }

        self.state = DriverState::Solving;
        let problem = PlacementProblem::build(&SlotInput {
            fleet: &self.fleet,
            catalog: &self.scenario.catalog,
            requests: &self.requests,
            power_model: &self.config.power_model,
            time_slot_interval: self.scenario.time_slot_interval,
            battery_floor: self.config.battery_floor,
            fairness_lower_bound: self.config.fairness_lower_bound,
            objective: self.objective,
        });
        debug!(
            "Slot {}: model with {} binary variables and {} constraints",
            self.slots_applied,
            problem.stats.placement_variables,
            problem.stats.constraint_count()
        );

        self.metrics_collector.borrow_mut().solver_calls += 1;
        let outcome = match solver.solve(problem) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.state = DriverState::Failed;
                error!("Slot {}: solver failed: {}", self.slots_applied, err);
                return Err(err.into());
            }
        };

        match outcome {
            SolveOutcome::Optimal(solution) => {
                let applied = self.apply(solution);
                self.state = DriverState::Ready;
                Ok(SlotOutcome::Applied(applied))
            }
            SolveOutcome::Infeasible { solve_duration } => {
                self.metrics_collector
                    .borrow_mut()
                    .increment_solve_time(solve_duration.as_secs_f64());
                self.state = DriverState::Exhausted;
                info!(
                    "Fleet of {} uavs exhausted at slot {}, endurance {} slots",
                    self.fleet.size(),
                    self.slots_applied,
                    self.endurance()
                );
                Ok(SlotOutcome::Exhausted)
            }
        }
    }

    /// Drains every battery by the energy realized at the solved placement and draws the
    /// workload of the next slot.
    fn apply(&mut self, solution: SlotSolution) -> AppliedSlot {
        let slot = self.slots_applied;
        let catalog = &self.scenario.catalog;

        let usages: Vec<UavUsage> = self
            .fleet
            .iter()
            .map(|(uav_id, uav)| {
                UavUsage::evaluate(
                    &self.config.power_model,
                    catalog,
                    uav_id,
                    uav,
                    &self.requests,
                    &solution.placement,
                    self.scenario.time_slot_interval,
                )
            })
            .collect();

        let mut fleet_energy = 0.0;
        for (uav_id, usage) in usages.into_iter().enumerate() {
            let uav = self.fleet.uav_mut(uav_id);
            uav.discharge(usage.energy);
            let battery = uav.battery();
            fleet_energy += usage.energy;
            trace!(
                "Slot {}: uav {} cpu {:.3} up {:.3} down {:.3} energy {:.4} battery {:.4}",
                slot,
                uav_id,
                usage.cpu_utilization,
                usage.uplink_data_rate,
                usage.downlink_data_rate,
                usage.energy,
                battery
            );

            self.records.push(SlotRecord {
                uav: uav_id,
                slot,
                services_deployed: (0..catalog.service_count())
                    .map(|service| solution.placement.is_service_deployed(uav_id, service))
                    .collect(),
                battery,
                energy: usage.energy,
                cpu_utilization: usage.cpu_utilization * 100.0,
                ram_usage: usage.ram_usage,
                downlink_data_rate: usage.downlink_data_rate,
                uplink_data_rate: usage.uplink_data_rate,
            });
        }

        // replaced, never accumulated
        self.requests = self.generator.generate(
            self.fleet.size(),
            catalog.service_count(),
            self.scenario.n_requests,
        );
        self.slots_applied += 1;

        let min_battery = self.fleet.min_battery();
        let mut metrics = self.metrics_collector.borrow_mut();
        metrics.slots_applied += 1;
        metrics.increment_solve_time(solution.solve_duration.as_secs_f64());
        metrics.increment_fleet_energy(fleet_energy);
        metrics.increment_min_battery(min_battery);
        metrics.increment_fairness(solution.fairness);

        debug!(
            "Slot {}: objective {:.4}, fairness {:.4}, min battery {:.4}, solved in {:.2?}",
            slot, solution.objective_value, solution.fairness, min_battery, solution.solve_duration
        );

        AppliedSlot {
            slot,
            placement: solution.placement,
            fairness: solution.fairness,
            objective_value: solution.objective_value,
            fleet_energy,
            min_battery,
        }
    }

    pub fn run_with_callbacks(
        &mut self,
        solver: &dyn PlacementSolver,
        mut callbacks: Box<dyn SimulationCallbacks>,
    ) -> Result<RunSummary, SimulationError> {
        callbacks.on_simulation_start(self);

        let t = Instant::now();
        let termination = loop {
            if !callbacks.on_step(self) {
                break Termination::SlotLimitReached;
            }
            if let SlotOutcome::Exhausted = self.step(solver)? {
                break Termination::Exhausted;
            }
        };
        let duration = t.elapsed().as_secs_f64();
        info!(
            "Simulated {} slots of a fleet of {} uavs in {:.2?}s ({:.1} slots/s)",
            self.slots_applied,
            self.fleet.size(),
            duration,
            self.slots_applied as f64 / duration
        );

        callbacks.on_simulation_finish(self);

        Ok(RunSummary {
            fleet_size: self.fleet.size(),
            endurance: self.endurance(),
            termination,
        })
    }

    /// Runs until the fleet is exhausted, or for at most `max_slots` slots if configured.
    pub fn run(&mut self, solver: &dyn PlacementSolver) -> Result<RunSummary, SimulationError> {
        let callbacks: Box<dyn SimulationCallbacks> = match self.config.max_slots {
            Some(max_slots) => Box::new(RunForSlotsCallbacks::new(max_slots)),
            None => Box::new(RunUntilExhaustedCallbacks {}),
        };
        self.run_with_callbacks(solver, callbacks)
    }
}
