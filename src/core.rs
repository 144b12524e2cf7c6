pub mod common;
pub mod fleet;
pub mod placement;
pub mod power_model;
pub mod service;
pub mod uav;
pub mod usage;
pub mod workload;
