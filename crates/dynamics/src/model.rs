use traj_core::constants::{DEFAULT_AIR_DENSITY, DEFAULT_DRAG_COEFFICIENT, DEFAULT_GRAVITY};
use traj_core::vector::{self, Vector2};
use traj_wind::WindField;

use crate::state::State;

/// Physical properties of the projectile for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileParams {
    /// Mass (kg), must be positive.
    pub mass: f64,
    /// Frontal area (m²), must be positive.
    pub cross_sectional_area: f64,
}

/// Environment shared read-only by every derivative evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentParams {
    pub gravity: f64,
    pub air_density: f64,
    pub drag_coefficient: f64,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            air_density: DEFAULT_AIR_DENSITY,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
        }
    }
}

/// Equations of motion bound to a projectile, an environment and a wind field.
#[derive(Debug, Clone, Copy)]
pub struct MotionModel {
    projectile: ProjectileParams,
    environment: EnvironmentParams,
    wind: WindField,
}

impl MotionModel {
    pub fn new(projectile: ProjectileParams, environment: EnvironmentParams, wind: WindField) -> Self {
        Self {
            projectile,
            environment,
            wind,
        }
    }

    pub fn projectile(&self) -> &ProjectileParams {
        &self.projectile
    }

    pub fn environment(&self) -> &EnvironmentParams {
        &self.environment
    }

    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    /// Velocity relative to the local air mass.
    pub fn relative_velocity(&self, state: &State, time: f64) -> Vector2 {
        let wind = self.wind.vector(time, state.y);
        vector::sub(&state.velocity(), &wind)
    }

    /// Drag force magnitude (N) at a given airspeed.
    pub fn drag_force(&self, relative_speed: f64) -> f64 {
        let env = &self.environment;
        0.5 * env.air_density
            * relative_speed
            * relative_speed
            * env.drag_coefficient
            * self.projectile.cross_sectional_area
    }

    /// Acceleration from gravity and drag.
    ///
    /// With zero airspeed the drag direction is undefined, so only gravity acts.
    pub fn acceleration(&self, state: &State, time: f64) -> Vector2 {
        let gravity = [0.0, -self.environment.gravity];
        let v_rel = self.relative_velocity(state, time);
        let speed = vector::norm(&v_rel);
        if speed > 0.0 {
            let drag = self.drag_force(speed);
            let per_unit = drag / (self.projectile.mass * speed);
            vector::sub(&gravity, &vector::scale(&v_rel, per_unit))
        } else {
            gravity
        }
    }

    /// State derivative `[dx, dy, dvx, dvy]`.
    pub fn derivative(&self, state: &State, time: f64) -> [f64; 4] {
        let [ax, ay] = self.acceleration(state, time);
        [state.vx, state.vy, ax, ay]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traj_wind::{Turbulence, WindConfig};

    fn still_air() -> WindField {
        WindField::with_turbulence(
            WindConfig::default(),
            Turbulence {
                amplitude: 0.0,
                frequency_hz: 0.2,
            },
        )
    }

    fn unit_projectile() -> ProjectileParams {
        ProjectileParams {
            mass: 1.0,
            cross_sectional_area: 0.1,
        }
    }

    #[test]
    fn position_derivative_is_velocity() {
        let model = MotionModel::new(unit_projectile(), EnvironmentParams::default(), WindField::calm());
        let state = State::new(3.0, 4.0, -2.0, 7.5);
        let d = model.derivative(&state, 1.7);
        assert_eq!(d[0], -2.0);
        assert_eq!(d[1], 7.5);
    }

    #[test]
    fn drag_opposes_motion_with_quadratic_magnitude() {
        let model = MotionModel::new(unit_projectile(), EnvironmentParams::default(), still_air());
        let state = State::new(0.0, 0.0, 10.0, 0.0);
        let [ax, ay] = model.acceleration(&state, 0.0);
        let expected = 0.5 * 1.225 * 100.0 * 0.47 * 0.1;
        assert!((ax + expected).abs() < 1e-12);
        assert!((ay + 9.81).abs() < 1e-12);
    }

    #[test]
    fn zero_airspeed_leaves_pure_gravity() {
        // projectile drifting exactly with a steady eastward wind and no turbulence
        let wind = WindField::with_turbulence(
            WindConfig::from_degrees(4.0, 90.0, false),
            Turbulence {
                amplitude: 0.0,
                frequency_hz: 0.2,
            },
        );
        let model = MotionModel::new(unit_projectile(), EnvironmentParams::default(), wind);
        let [wx, wy] = wind.vector(0.0, 0.0);
        let state = State::new(0.0, 0.0, wx, wy);
        assert_eq!(model.acceleration(&state, 0.0), [0.0, -9.81]);
    }

    #[test]
    fn tailwind_reduces_drag() {
        let calm = MotionModel::new(unit_projectile(), EnvironmentParams::default(), still_air());
        let tail = MotionModel::new(
            unit_projectile(),
            EnvironmentParams::default(),
            WindField::new(WindConfig::from_degrees(5.0, 90.0, false)),
        );
        let state = State::new(0.0, 0.0, 10.0, 0.0);
        assert!(tail.acceleration(&state, 0.0)[0] > calm.acceleration(&state, 0.0)[0]);
    }

    #[test]
    fn vacuum_has_no_drag() {
        let env = EnvironmentParams {
            air_density: 0.0,
            ..EnvironmentParams::default()
        };
        let model = MotionModel::new(unit_projectile(), env, WindField::calm());
        let state = State::new(0.0, 100.0, 30.0, -5.0);
        assert_eq!(model.acceleration(&state, 2.0), [0.0, -9.81]);
    }
}
