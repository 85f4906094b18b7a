//! Entry point used by every front end: validate a configuration, run the
//! integrator, hand back the sampled trajectory.

pub mod analysis;
mod facade;

pub use analysis::{GroundCrossing, SamplePoint, TrajectorySummary};
pub use facade::{SimulationError, Simulator};
pub use traj_config::{
    EnvironmentConfig, InitialConditions, InvalidReason, ParameterMap, SimulationConfig,
    WindSettings, keys,
};
pub use traj_dynamics::{Trajectory, TrajectorySample};
pub use traj_integrator::{CancellationToken, IntegrationMethod, RunControl};
