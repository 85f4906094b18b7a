//! Configuration models and loaders for the Trajectory Simulator.
//!
//! Front ends hand the simulator a flat key/value mapping (entry widgets,
//! CLI flags, YAML/TOML files). [`SimulationConfig::from_parameters`] turns
//! that mapping into typed, validated settings.

mod params;

use std::fs::File;
use std::path::Path;

use thiserror::Error;
use traj_core::constants::{
    DEFAULT_AIR_DENSITY, DEFAULT_DRAG_COEFFICIENT, DEFAULT_GRAVITY, DEFAULT_MAX_TIME,
    DEFAULT_TIME_STEP,
};
use traj_integrator::IntegrationMethod;

pub use params::{ParameterMap, ParameterValue};

/// Recognised mapping keys. Anything else is ignored.
pub mod keys {
    pub const X0: &str = "x0";
    pub const Y0: &str = "y0";
    pub const VX0: &str = "vx0";
    pub const VY0: &str = "vy0";
    pub const MASS: &str = "mass";
    pub const CROSS_SECTIONAL_AREA: &str = "cross_sectional_area";
    pub const TIME_STEP: &str = "time_step";
    pub const MAX_TIME: &str = "max_time";
    pub const GRAVITY: &str = "gravity";
    pub const AIR_DENSITY: &str = "air_density";
    pub const DRAG_COEFFICIENT: &str = "drag_coefficient";
    pub const WIND_SPEED: &str = "wind_speed";
    pub const WIND_DIRECTION: &str = "wind_direction";
    pub const ALTITUDE_VARIATION: &str = "altitude_variation";
    pub const INTEGRATOR: &str = "integrator";
    pub const TRUNCATE_AT_GROUND: &str = "truncate_at_ground";
}

/// Launch state, projectile properties and sampling horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub x0: f64,
    pub y0: f64,
    pub vx0: f64,
    pub vy0: f64,
    pub mass: f64,
    pub cross_sectional_area: f64,
    pub time_step: f64,
    pub max_time: f64,
}

/// Environment overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    pub gravity: f64,
    pub air_density: f64,
    pub drag_coefficient: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            air_density: DEFAULT_AIR_DENSITY,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
        }
    }
}

/// Steady wind settings; direction is a compass bearing in degrees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindSettings {
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
    pub altitude_variation: bool,
}

/// Everything needed for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial: InitialConditions,
    pub wind: WindSettings,
    pub environment: EnvironmentConfig,
    pub integrator: IntegrationMethod,
    pub truncate_at_ground: bool,
}

/// Why a configuration field was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidReason {
    #[error("is required")]
    Missing,
    #[error("must be a number (got {0})")]
    NotNumeric(String),
    #[error("must be a boolean (got {0})")]
    NotBoolean(String),
    #[error("must be finite")]
    NonFinite,
    #[error("must be positive")]
    NotPositive,
    #[error("must not be negative")]
    Negative,
    #[error("{0}")]
    Unsupported(String),
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: '{field}' {reason}")]
    Invalid { field: String, reason: InvalidReason },
}

impl ConfigError {
    fn invalid(field: &str, reason: InvalidReason) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason,
        }
    }
}

/// Load a parameter mapping from a YAML file, or TOML when the extension is `.toml`.
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<ParameterMap, ConfigError> {
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

impl SimulationConfig {
    /// Build and validate a configuration from a raw mapping, applying defaults.
    pub fn from_parameters(params: &ParameterMap) -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<f64, ConfigError> {
            params
                .number(key)?
                .ok_or_else(|| ConfigError::invalid(key, InvalidReason::Missing))
        };
        let optional = |key: &str, default: f64| -> Result<f64, ConfigError> {
            Ok(params.number(key)?.unwrap_or(default))
        };

        let initial = InitialConditions {
            x0: required(keys::X0)?,
            y0: required(keys::Y0)?,
            vx0: required(keys::VX0)?,
            vy0: required(keys::VY0)?,
            mass: required(keys::MASS)?,
            cross_sectional_area: required(keys::CROSS_SECTIONAL_AREA)?,
            time_step: optional(keys::TIME_STEP, DEFAULT_TIME_STEP)?,
            max_time: optional(keys::MAX_TIME, DEFAULT_MAX_TIME)?,
        };

        let environment = EnvironmentConfig {
            gravity: optional(keys::GRAVITY, DEFAULT_GRAVITY)?,
            air_density: optional(keys::AIR_DENSITY, DEFAULT_AIR_DENSITY)?,
            drag_coefficient: optional(keys::DRAG_COEFFICIENT, DEFAULT_DRAG_COEFFICIENT)?,
        };

        let wind = WindSettings {
            wind_speed: optional(keys::WIND_SPEED, 0.0)?,
            wind_direction_deg: optional(keys::WIND_DIRECTION, 0.0)?,
            altitude_variation: params.flag(keys::ALTITUDE_VARIATION)?.unwrap_or(false),
        };

        let integrator = match params.text(keys::INTEGRATOR)? {
            Some(name) => name.parse::<IntegrationMethod>().map_err(|err| {
                ConfigError::invalid(keys::INTEGRATOR, InvalidReason::Unsupported(err.to_string()))
            })?,
            None => IntegrationMethod::default(),
        };

        let config = SimulationConfig {
            initial,
            wind,
            environment,
            integrator,
            truncate_at_ground: params.flag(keys::TRUNCATE_AT_GROUND)?.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check finiteness and domain constraints of every numeric field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let init = &self.initial;
        for (field, value) in [
            (keys::X0, init.x0),
            (keys::Y0, init.y0),
            (keys::VX0, init.vx0),
            (keys::VY0, init.vy0),
            (keys::WIND_SPEED, self.wind.wind_speed),
            (keys::WIND_DIRECTION, self.wind.wind_direction_deg),
        ] {
            finite(field, value)?;
        }
        for (field, value) in [
            (keys::MASS, init.mass),
            (keys::CROSS_SECTIONAL_AREA, init.cross_sectional_area),
            (keys::TIME_STEP, init.time_step),
            (keys::MAX_TIME, init.max_time),
            (keys::GRAVITY, self.environment.gravity),
        ] {
            positive(field, value)?;
        }
        for (field, value) in [
            (keys::AIR_DENSITY, self.environment.air_density),
            (keys::DRAG_COEFFICIENT, self.environment.drag_coefficient),
        ] {
            non_negative(field, value)?;
        }
        Ok(())
    }
}

fn finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, InvalidReason::NonFinite))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, InvalidReason::NotPositive))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, InvalidReason::Negative))
    }
}
