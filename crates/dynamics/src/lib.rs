//! Planar point-mass dynamics under gravity, quadratic drag, and wind.

mod model;
mod state;
mod trajectory;

pub use model::{EnvironmentParams, MotionModel, ProjectileParams};
pub use state::State;
pub use trajectory::{Trajectory, TrajectoryIntegrator, TrajectorySample};
