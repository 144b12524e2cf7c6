use good_lp::ResolutionError;
use thiserror::Error;

use crate::core::common::ReplicaId;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Failures of the placement optimizer. An infeasible model is not one of them.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("solver failed: {0}")]
    Solver(#[from] ResolutionError),

    #[error("solved placement deploys replica {replica:?} {count} times")]
    InconsistentSolution { replica: ReplicaId, count: usize },
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to parse simulation config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("invalid fleet: {0}")]
    InvalidFleet(String),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("simulation {0:?} has failed and cannot step further")]
    Halted(String),

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
