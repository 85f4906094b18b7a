use thiserror::Error;
use traj_config::{
    ConfigError, EnvironmentConfig, InitialConditions, InvalidReason, ParameterMap,
    SimulationConfig, WindSettings, keys,
};
use traj_dynamics::{EnvironmentParams, ProjectileParams, State, Trajectory, TrajectoryIntegrator};
use traj_integrator::{IntegrationError, IntegrationMethod, RunControl};
use traj_wind::{WindConfig, WindField};

/// Errors surfaced by a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: '{field}' {reason}")]
    InvalidConfiguration { field: String, reason: InvalidReason },
    #[error(transparent)]
    Config(ConfigError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { field, reason } => {
                SimulationError::InvalidConfiguration { field, reason }
            }
            other => SimulationError::Config(other),
        }
    }
}

/// Runs trajectories against a fixed environment.
///
/// The simulator owns no mutable state; each run builds its own wind field
/// and motion model, so one value can serve any number of runs or threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulator {
    environment: EnvironmentConfig,
    method: IntegrationMethod,
    truncate_at_ground: bool,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(EnvironmentConfig::default())
    }
}

impl Simulator {
    pub fn new(environment: EnvironmentConfig) -> Self {
        Self {
            environment,
            method: IntegrationMethod::default(),
            truncate_at_ground: false,
        }
    }

    pub fn with_method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }

    /// Stop reporting samples after the first downward crossing of `y = 0`.
    pub fn with_ground_truncation(mut self, enabled: bool) -> Self {
        self.truncate_at_ground = enabled;
        self
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    pub fn method(&self) -> &IntegrationMethod {
        &self.method
    }

    /// Simulate one launch. `environment` overrides the simulator's own when given.
    pub fn run(
        &self,
        initial: &InitialConditions,
        wind: &WindSettings,
        environment: Option<&EnvironmentConfig>,
    ) -> Result<Trajectory, SimulationError> {
        self.run_with_control(initial, wind, environment, &RunControl::default())
    }

    /// Like [`run`](Self::run), honouring a cancellation token or deadline.
    pub fn run_with_control(
        &self,
        initial: &InitialConditions,
        wind: &WindSettings,
        environment: Option<&EnvironmentConfig>,
        control: &RunControl,
    ) -> Result<Trajectory, SimulationError> {
        let config = SimulationConfig {
            initial: initial.clone(),
            wind: wind.clone(),
            environment: environment.unwrap_or(&self.environment).clone(),
            integrator: self.method,
            truncate_at_ground: self.truncate_at_ground,
        };
        Self::run_config(&config, control)
    }

    /// Simulate from a raw key/value mapping.
    ///
    /// Keys absent from `params` fall back to this simulator's environment,
    /// method and truncation setting.
    pub fn run_parameters(&self, params: &ParameterMap) -> Result<Trajectory, SimulationError> {
        self.run_parameters_with_control(params, &RunControl::default())
    }

    pub fn run_parameters_with_control(
        &self,
        params: &ParameterMap,
        control: &RunControl,
    ) -> Result<Trajectory, SimulationError> {
        let config = self.resolve(params)?;
        Self::run_config(&config, control)
    }

    /// Layer `params` over this simulator's settings and validate the result.
    pub fn resolve(&self, params: &ParameterMap) -> Result<SimulationConfig, SimulationError> {
        let mut merged = ParameterMap::new()
            .with(keys::GRAVITY, self.environment.gravity)
            .with(keys::AIR_DENSITY, self.environment.air_density)
            .with(keys::DRAG_COEFFICIENT, self.environment.drag_coefficient)
            .with(keys::TRUNCATE_AT_GROUND, self.truncate_at_ground);
        merged.merge(params.clone());

        let mut config = SimulationConfig::from_parameters(&merged)?;
        if params.get(keys::INTEGRATOR).is_none() {
            config.integrator = self.method;
        }
        Ok(config)
    }

    /// Validate and run a fully specified configuration.
    pub fn run_config(
        config: &SimulationConfig,
        control: &RunControl,
    ) -> Result<Trajectory, SimulationError> {
        config.validate()?;

        let init = &config.initial;
        let wind = WindField::new(WindConfig::from_degrees(
            config.wind.wind_speed,
            config.wind.wind_direction_deg,
            config.wind.altitude_variation,
        ));
        let projectile = ProjectileParams {
            mass: init.mass,
            cross_sectional_area: init.cross_sectional_area,
        };
        let environment = EnvironmentParams {
            gravity: config.environment.gravity,
            air_density: config.environment.air_density,
            drag_coefficient: config.environment.drag_coefficient,
        };
        let initial_state = State::new(init.x0, init.y0, init.vx0, init.vy0);

        log::info!(
            "simulating {} s at dt = {} s with the {} integrator",
            init.max_time,
            init.time_step,
            config.integrator.name()
        );

        let trajectory = TrajectoryIntegrator::new(config.integrator)
            .with_control(control.clone())
            .integrate(
                initial_state,
                projectile,
                environment,
                wind,
                init.time_step,
                init.max_time,
            )?;
        let trajectory = if config.truncate_at_ground {
            trajectory.truncated_at_ground()
        } else {
            trajectory
        };

        log::info!("simulation produced {} samples", trajectory.len());
        Ok(trajectory)
    }
}
