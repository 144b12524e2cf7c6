//! Solver capability used by the simulation and its single process-wide environment.

use std::cell::Cell;
use std::time::{Duration, Instant};

use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use log::{debug, info};

use crate::core::placement::model::PlacementProblem;
use crate::core::placement::placement::Placement;
use crate::error::PlacementError;

/// Result of an optimal solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSolution {
    pub placement: Placement,
    /// Value of the fairness variable.
    pub fairness: f64,
    pub objective_value: f64,
    pub solve_duration: Duration,
}

/// Statuses a solve may end with. Any other status is a [`PlacementError`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(SlotSolution),
    /// No placement satisfies the constraints of the slot.
    Infeasible { solve_duration: Duration },
}

// Trait which should implement any MILP backend able to solve slot models.
pub trait PlacementSolver {
    // Solves one slot model. The model is consumed, it is never reused for another slot.
    fn solve(&self, problem: PlacementProblem) -> Result<SolveOutcome, PlacementError>;
}

/// Solver environment shared by all slot models of a process run. Create it once with
/// [`SolverEnvironment::start`] and drop it when the run is over.
pub struct SolverEnvironment {
    solves: Cell<u64>,
    started_at: Instant,
}

impl SolverEnvironment {
    pub fn start() -> Self {
        info!("Solver environment started (backend: microlp)");
        Self {
            solves: Cell::new(0),
            started_at: Instant::now(),
        }
    }

    /// Number of models solved so far.
    pub fn solve_count(&self) -> u64 {
        self.solves.get()
    }
}

impl Drop for SolverEnvironment {
    fn drop(&mut self) {
        info!(
            "Solver environment released after {} solves in {:.2?}",
            self.solves.get(),
            self.started_at.elapsed()
        );
    }
}

impl PlacementSolver for SolverEnvironment {
    fn solve(&self, problem: PlacementProblem) -> Result<SolveOutcome, PlacementError> {
        let PlacementProblem {
            variables,
            placement,
            fairness,
            constraints,
            objective,
            stats,
        } = problem;

        let start = Instant::now();
        let mut model = variables.maximise(objective.clone()).using(default_solver);
        for constraint in constraints {
            model = model.with(constraint);
        }
        let result = model.solve();
        let solve_duration = start.elapsed();
        self.solves.set(self.solves.get() + 1);

        debug!(
            "Solved model with {} binary variables and {} constraints in {:.2?}",
            stats.placement_variables,
            stats.constraint_count(),
            solve_duration
        );

        match result {
            Ok(solution) => Ok(SolveOutcome::Optimal(SlotSolution {
                placement: placement.extract(&solution)?,
                fairness: solution.value(fairness),
                objective_value: objective.eval_with(&solution),
                solve_duration,
            })),
            Err(ResolutionError::Infeasible) => Ok(SolveOutcome::Infeasible { solve_duration }),
            Err(err) => Err(PlacementError::Solver(err)),
        }
    }
}
