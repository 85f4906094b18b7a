//! Point-mass trajectory simulation with drag and wind.
//!
//! The physics lives in the workspace crates re-exported below. Keeping the
//! front ends (CLI, plot renderer) on this umbrella crate lets them share one
//! dependency line.

pub use traj_config as config;
pub use traj_core as common;
pub use traj_dynamics as dynamics;
pub use traj_export as export;
pub use traj_integrator as integrator;
pub use traj_simulation as simulation;
pub use traj_wind as wind;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
