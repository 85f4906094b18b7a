use traj_integrator::{IntegrationError, IntegrationMethod, RunControl, sample_times, solve};
use traj_wind::WindField;

use crate::model::{EnvironmentParams, MotionModel, ProjectileParams};
use crate::state::State;

/// One row of a sampled trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl TrajectorySample {
    pub fn state(&self) -> State {
        State::new(self.x, self.y, self.vx, self.vy)
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Samples ordered by strictly increasing time, starting at `t = 0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    fn from_states(times: &[f64], states: Vec<[f64; 4]>) -> Self {
        let samples = times
            .iter()
            .zip(states)
            .map(|(&time, [x, y, vx, vy])| TrajectorySample {
                time,
                x,
                y,
                vx,
                vy,
            })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<TrajectorySample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.column(|s| s.time)
    }

    pub fn xs(&self) -> Vec<f64> {
        self.column(|s| s.x)
    }

    pub fn ys(&self) -> Vec<f64> {
        self.column(|s| s.y)
    }

    pub fn vxs(&self) -> Vec<f64> {
        self.column(|s| s.vx)
    }

    pub fn vys(&self) -> Vec<f64> {
        self.column(|s| s.vy)
    }

    fn column(&self, f: impl Fn(&TrajectorySample) -> f64) -> Vec<f64> {
        self.samples.iter().map(f).collect()
    }

    /// Sample with the greatest altitude (earliest on ties).
    pub fn apex(&self) -> Option<&TrajectorySample> {
        self.samples
            .iter()
            .reduce(|best, s| if s.y > best.y { s } else { best })
    }

    /// Index of the first sample below ground whose predecessor was at or above it.
    pub fn ground_crossing_index(&self) -> Option<usize> {
        self.samples
            .windows(2)
            .position(|w| w[0].y >= 0.0 && w[1].y < 0.0)
            .map(|i| i + 1)
    }

    /// Drop every sample after the first downward ground crossing.
    ///
    /// The first below-ground sample is kept so the crossing stays bracketed.
    pub fn truncated_at_ground(mut self) -> Self {
        if let Some(index) = self.ground_crossing_index() {
            log::debug!(
                "truncating trajectory at sample {index} of {} (t = {} s)",
                self.samples.len(),
                self.samples[index].time
            );
            self.samples.truncate(index + 1);
        }
        self
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Drives a [`MotionModel`] across the sample-time grid.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryIntegrator {
    method: IntegrationMethod,
    control: RunControl,
}

impl TrajectoryIntegrator {
    pub fn new(method: IntegrationMethod) -> Self {
        Self {
            method,
            control: RunControl::default(),
        }
    }

    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    pub fn method(&self) -> &IntegrationMethod {
        &self.method
    }

    /// Sample the trajectory on `[0, max_time)` every `time_step` seconds.
    pub fn integrate(
        &self,
        initial_state: State,
        projectile: ProjectileParams,
        environment: EnvironmentParams,
        wind: WindField,
        time_step: f64,
        max_time: f64,
    ) -> Result<Trajectory, IntegrationError> {
        let model = MotionModel::new(projectile, environment, wind);
        self.integrate_model(&model, initial_state, time_step, max_time)
    }

    /// Same as [`integrate`](Self::integrate) for an already-bound model.
    pub fn integrate_model(
        &self,
        model: &MotionModel,
        initial_state: State,
        time_step: f64,
        max_time: f64,
    ) -> Result<Trajectory, IntegrationError> {
        let times = sample_times(time_step, max_time);
        let rhs = |t: f64, y: &[f64; 4]| model.derivative(&State::from_array(*y), t);
        let integrator = self.method.integrator::<4>();
        let states = solve(
            integrator.as_ref(),
            &rhs,
            initial_state.to_array(),
            &times,
            &self.control,
        )?;
        Ok(Trajectory::from_states(&times, states))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traj_integrator::{AdaptiveRk4, RungeKutta4};
    use traj_wind::WindConfig;

    fn sample(time: f64, y: f64) -> TrajectorySample {
        TrajectorySample {
            time,
            x: time,
            y,
            vx: 1.0,
            vy: 0.0,
        }
    }

    #[test]
    fn rk4_and_adaptive_agree_on_a_drag_trajectory() {
        let projectile = ProjectileParams {
            mass: 1.0,
            cross_sectional_area: 0.1,
        };
        let wind = WindField::new(WindConfig::from_degrees(5.0, 60.0, true));
        let initial = State::new(0.0, 0.0, 10.0, 25.0);

        let fixed = TrajectoryIntegrator::new(IntegrationMethod::Rk4(RungeKutta4::new(16)))
            .integrate(initial, projectile, EnvironmentParams::default(), wind, 0.1, 4.0)
            .unwrap();
        let adaptive = TrajectoryIntegrator::new(IntegrationMethod::Adaptive(
            AdaptiveRk4::with_tolerances(1e-10, 1e-10),
        ))
        .integrate(initial, projectile, EnvironmentParams::default(), wind, 0.1, 4.0)
        .unwrap();

        assert_eq!(fixed.len(), adaptive.len());
        for (a, b) in fixed.iter().zip(&adaptive) {
            assert_eq!(a.time, b.time);
            assert!((a.x - b.x).abs() < 1e-6 * a.x.abs().max(1.0));
            assert!((a.y - b.y).abs() < 1e-6 * a.y.abs().max(1.0));
        }
    }

    #[test]
    fn first_sample_is_the_initial_condition() {
        let initial = State::new(1.0, 2.0, 3.0, 4.0);
        let trajectory = TrajectoryIntegrator::default()
            .integrate(
                initial,
                ProjectileParams {
                    mass: 2.0,
                    cross_sectional_area: 0.05,
                },
                EnvironmentParams::default(),
                WindField::calm(),
                0.5,
                2.0,
            )
            .unwrap();
        let first = trajectory.first().unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.state(), initial);
        assert_eq!(trajectory.times(), vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn truncation_keeps_first_sample_below_ground() {
        let trajectory = Trajectory {
            samples: vec![
                sample(0.0, 0.0),
                sample(1.0, 4.0),
                sample(2.0, 1.0),
                sample(3.0, -2.0),
                sample(4.0, -9.0),
            ],
        };
        assert_eq!(trajectory.ground_crossing_index(), Some(3));
        let cut = trajectory.truncated_at_ground();
        assert_eq!(cut.len(), 4);
        assert_eq!(cut.last().unwrap().y, -2.0);
    }

    #[test]
    fn truncation_ignores_a_start_below_ground() {
        let trajectory = Trajectory {
            samples: vec![sample(0.0, -1.0), sample(1.0, -0.5), sample(2.0, -3.0)],
        };
        assert_eq!(trajectory.ground_crossing_index(), None);
        assert_eq!(trajectory.clone().truncated_at_ground(), trajectory);
    }

    #[test]
    fn apex_picks_highest_sample() {
        let trajectory = Trajectory {
            samples: vec![sample(0.0, 0.0), sample(1.0, 4.0), sample(2.0, 1.0)],
        };
        assert_eq!(trajectory.apex().unwrap().time, 1.0);
        assert!(Trajectory::default().apex().is_none());
    }
}
