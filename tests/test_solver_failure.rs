mod helpers;

use std::cell::Cell;

use good_lp::ResolutionError;

use uav_fleet_endurance::core::placement::model::PlacementProblem;
use uav_fleet_endurance::core::placement::solver::{PlacementSolver, SolveOutcome, SolverEnvironment};
use uav_fleet_endurance::error::{PlacementError, SimulationError};
use uav_fleet_endurance::simulator::DriverState;
use uav_fleet_endurance::test_util::helpers::{
    default_test_fleet, default_test_scenario, default_test_simulation_config,
};

use helpers::new_simulation;

/// Delegates the first `healthy_solves` models to microlp and fails every later one.
struct FailingSolver {
    inner: SolverEnvironment,
    healthy_solves: u64,
    calls: Cell<u64>,
}

impl PlacementSolver for FailingSolver {
    fn solve(&self, problem: PlacementProblem) -> Result<SolveOutcome, PlacementError> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() > self.healthy_solves {
            return Err(PlacementError::Solver(ResolutionError::Unbounded));
        }
        self.inner.solve(problem)
    }
}

#[test]
fn test_solver_failure_is_not_exhaustion() {
    let mut sim = new_simulation(
        default_test_simulation_config(None),
        default_test_scenario(),
        default_test_fleet(2),
    );
    let solver = FailingSolver {
        inner: SolverEnvironment::start(),
        healthy_solves: 2,
        calls: Cell::new(0),
    };

    let err = sim.run(&solver).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Placement(PlacementError::Solver(ResolutionError::Unbounded))
    ));
    assert_eq!(DriverState::Failed, sim.state());
    assert_eq!(2, sim.endurance());
    assert_eq!(4, sim.records().len());

    // a failed run refuses to go on
    let err = sim.step(&solver).unwrap_err();
    assert!(matches!(err, SimulationError::Halted(_)));
    assert_eq!(3, solver.calls.get());
}
