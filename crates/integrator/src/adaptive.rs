//! Error-controlled RK4 using step doubling.
//!
//! Each trial step is taken once with `h` and twice with `h / 2`; the
//! difference estimates the local error and Richardson extrapolation of the
//! pair gives a fifth-order accepted state.

use crate::rk4::rk4_step;
use crate::{IntegrationError, Integrator, Rhs};

pub(crate) const NAME: &str = "adaptive";

/// Adaptive step-doubling RK4 with mixed absolute/relative tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveRk4 {
    pub rtol: f64,
    pub atol: f64,
    /// Smallest step the controller may shrink to before giving up (s).
    pub min_step: f64,
    /// Largest internal step (s).
    pub max_step: f64,
}

impl Default for AdaptiveRk4 {
    fn default() -> Self {
        Self {
            rtol: 1e-9,
            atol: 1e-9,
            min_step: 1e-10,
            max_step: f64::INFINITY,
        }
    }
}

impl AdaptiveRk4 {
    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }
}

impl<const N: usize> Integrator<N> for AdaptiveRk4 {
    fn name(&self) -> &'static str {
        NAME
    }

    fn advance(
        &self,
        rhs: &Rhs<'_, N>,
        t0: f64,
        y0: &[f64; N],
        t1: f64,
    ) -> Result<[f64; N], IntegrationError> {
        let mut t = t0;
        let mut y = *y0;
        let mut h = (t1 - t0).min(self.max_step);

        while t < t1 {
            let remaining = t1 - t;
            let last = h >= remaining;
            if last {
                h = remaining;
            }

            let y_full = rk4_step(rhs, t, &y, h);
            let y_half = rk4_step(rhs, t, &y, 0.5 * h);
            let y_half2 = rk4_step(rhs, t + 0.5 * h, &y_half, 0.5 * h);

            let mut err_max: f64 = 0.0;
            let mut y_better = [0.0; N];
            for i in 0..N {
                let delta = (y_half2[i] - y_full[i]) / 15.0;
                y_better[i] = y_half2[i] + delta;
                let scale = self.atol + self.rtol * y[i].abs().max(y_better[i].abs());
                err_max = err_max.max(delta.abs() / scale);
            }
            if !err_max.is_finite() {
                return Err(IntegrationError::NonFiniteState { time: t });
            }

            if err_max <= 1.0 {
                y = y_better;
                t = if last { t1 } else { t + h };
                let growth = if err_max < 1e-10 {
                    5.0
                } else {
                    (0.9 * err_max.powf(-0.2)).clamp(0.2, 5.0)
                };
                h = (h * growth).min(self.max_step);
            } else {
                let shrunk = h * (0.9 * err_max.powf(-0.25)).max(0.1);
                if shrunk < self.min_step {
                    return Err(IntegrationError::StepSizeUnderflow {
                        time: t,
                        step: shrunk,
                    });
                }
                h = shrunk;
            }
        }

        Ok(y)
    }
}
