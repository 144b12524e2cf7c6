pub mod model;
pub mod objective;
pub mod placement;
pub mod solver;
