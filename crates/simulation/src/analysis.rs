//! Derived figures for a finished trajectory.

use serde::Serialize;
use traj_dynamics::{Trajectory, TrajectorySample};

/// A sample flattened for reports, with units in the field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub time_s: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub vx_m_s: f64,
    pub vy_m_s: f64,
}

impl From<&TrajectorySample> for SamplePoint {
    fn from(s: &TrajectorySample) -> Self {
        Self {
            time_s: s.time,
            x_m: s.x,
            y_m: s.y,
            vx_m_s: s.vx,
            vy_m_s: s.vy,
        }
    }
}

/// Where the trajectory first passes downward through `y = 0`, interpolated
/// linearly between the bracketing samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundCrossing {
    pub time_s: f64,
    pub x_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub sample_count: usize,
    pub apex: SamplePoint,
    pub final_sample: SamplePoint,
    /// Horizontal distance from launch to the ground crossing, or to the
    /// final sample when the trajectory never comes down through `y = 0`.
    pub range_m: f64,
    pub ground_crossing: Option<GroundCrossing>,
    pub peak_speed_m_s: f64,
}

impl TrajectorySummary {
    /// `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &Trajectory) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;
        let apex = trajectory.apex()?;

        let ground_crossing = trajectory.ground_crossing_index().map(|i| {
            let samples = trajectory.samples();
            interpolate_crossing(&samples[i - 1], &samples[i])
        });
        let end_x = ground_crossing.map(|c| c.x_m).unwrap_or(last.x);
        let peak_speed_m_s = trajectory
            .iter()
            .map(TrajectorySample::speed)
            .fold(0.0, f64::max);

        Some(Self {
            sample_count: trajectory.len(),
            apex: apex.into(),
            final_sample: last.into(),
            range_m: end_x - first.x,
            ground_crossing,
            peak_speed_m_s,
        })
    }

    pub fn flight_time_s(&self) -> Option<f64> {
        self.ground_crossing.map(|c| c.time_s)
    }
}

fn interpolate_crossing(above: &TrajectorySample, below: &TrajectorySample) -> GroundCrossing {
    let fraction = above.y / (above.y - below.y);
    GroundCrossing {
        time_s: above.time + fraction * (below.time - above.time),
        x_m: above.x + fraction * (below.x - above.x),
    }
}
