//! Wind field combining a steady (optionally altitude-scaled) component with
//! a deterministic sinusoidal turbulence term.
//!
//! Directions follow compass bearing: 0° blows along +y ("north") and 90°
//! along +x ("east"). The field holds no mutable state, so the same
//! `(time, altitude)` always yields the same vector.

use std::f64::consts::PI;

use traj_core::units::{deg_to_rad, rad_to_deg};
use traj_core::vector::{self, Vector2};

/// Fractional speed increase per kilometre of altitude when scaling is enabled.
const ALTITUDE_GAIN_PER_KM: f64 = 0.1;

/// Parameters of the steady wind component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindConfig {
    /// Base wind speed at altitude 0 (m/s).
    pub base_speed: f64,
    /// Bearing in radians, measured from +y towards +x.
    pub direction: f64,
    /// Scale speed linearly with altitude.
    pub altitude_variation: bool,
}

impl WindConfig {
    /// Build a configuration from a bearing in degrees.
    pub fn from_degrees(base_speed: f64, direction_deg: f64, altitude_variation: bool) -> Self {
        Self {
            base_speed,
            direction: deg_to_rad(direction_deg),
            altitude_variation,
        }
    }

    /// Bearing converted back to degrees.
    pub fn direction_deg(&self) -> f64 {
        rad_to_deg(self.direction)
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.0,
            direction: 0.0,
            altitude_variation: false,
        }
    }
}

/// Sinusoidal gust applied identically to both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turbulence {
    /// Peak gust speed (m/s).
    pub amplitude: f64,
    /// Oscillation frequency (Hz).
    pub frequency_hz: f64,
}

impl Default for Turbulence {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            frequency_hz: 0.2,
        }
    }
}

impl Turbulence {
    /// Gust speed at `time` seconds.
    #[inline]
    pub fn at(&self, time: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency_hz * time).sin()
    }
}

/// Wind velocity field as a pure function of time and altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindField {
    config: WindConfig,
    turbulence: Turbulence,
}

impl WindField {
    /// Field with the reference turbulence model.
    pub fn new(config: WindConfig) -> Self {
        Self::with_turbulence(config, Turbulence::default())
    }

    pub fn with_turbulence(config: WindConfig, turbulence: Turbulence) -> Self {
        Self { config, turbulence }
    }

    /// Zero steady wind. Turbulence still applies.
    pub fn calm() -> Self {
        Self::new(WindConfig::default())
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    pub fn turbulence_model(&self) -> &Turbulence {
        &self.turbulence
    }

    /// Steady speed at `altitude`; scaling is unbounded in both directions.
    pub fn speed_at(&self, altitude: f64) -> f64 {
        if self.config.altitude_variation {
            self.config.base_speed * (1.0 + ALTITUDE_GAIN_PER_KM * altitude / 1000.0)
        } else {
            self.config.base_speed
        }
    }

    /// Steady component at `altitude`.
    pub fn steady(&self, altitude: f64) -> Vector2 {
        let speed = self.speed_at(altitude);
        let bearing = self.config.direction;
        [speed * bearing.sin(), speed * bearing.cos()]
    }

    /// Turbulence component at `time`.
    pub fn turbulence(&self, time: f64) -> Vector2 {
        let gust = self.turbulence.at(time);
        [gust, gust]
    }

    /// Total wind at `time` and `altitude`.
    pub fn vector(&self, time: f64, altitude: f64) -> Vector2 {
        vector::add(&self.steady(altitude), &self.turbulence(time))
    }
}

impl Default for WindField {
    fn default() -> Self {
        Self::calm()
    }
}
