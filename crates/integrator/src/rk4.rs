use crate::{IntegrationError, Integrator, Rhs};

pub(crate) const NAME: &str = "rk4";

/// Classical fourth-order Runge-Kutta with equal substeps per sample interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RungeKutta4 {
    pub substeps: usize,
}

impl Default for RungeKutta4 {
    fn default() -> Self {
        Self { substeps: 8 }
    }
}

impl RungeKutta4 {
    pub fn new(substeps: usize) -> Self {
        Self { substeps }
    }
}

impl<const N: usize> Integrator<N> for RungeKutta4 {
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
        let n = self.substeps.max(1);
        let h = (t1 - t0) / n as f64;
        let mut y = *y0;
        for i in 0..n {
            y = rk4_step(rhs, t0 + i as f64 * h, &y, h);
        }
        Ok(y)
    }
}

/// Single classical RK4 step of size `h` from `(t, y)`.
pub(crate) fn rk4_step<const N: usize>(rhs: &Rhs<'_, N>, t: f64, y: &[f64; N], h: f64) -> [f64; N] {
    let k1 = rhs(t, y);

    let mut y2 = [0.0; N];
    for i in 0..N {
        y2[i] = y[i] + 0.5 * h * k1[i];
    }
    let k2 = rhs(t + 0.5 * h, &y2);

    let mut y3 = [0.0; N];
    for i in 0..N {
        y3[i] = y[i] + 0.5 * h * k2[i];
    }
    let k3 = rhs(t + 0.5 * h, &y3);

    let mut y4 = [0.0; N];
    for i in 0..N {
        y4[i] = y[i] + h * k3[i];
    }
    let k4 = rhs(t + h, &y4);

    let mut y_new = [0.0; N];
    for i in 0..N {
        y_new[i] = y[i] + h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    y_new
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_acceleration_is_integrated_exactly() {
        // x'' = -g as a first-order system [x, v]
        let rhs = |_t: f64, y: &[f64; 2]| [y[1], -9.81];
        let y = Integrator::<2>::advance(&RungeKutta4::new(1), &rhs, 0.0, &[0.0, 20.0], 2.0)
            .unwrap();
        let expected_x = 20.0 * 2.0 - 0.5 * 9.81 * 4.0;
        assert!((y[0] - expected_x).abs() < 1e-12);
        assert!((y[1] - (20.0 - 9.81 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn zero_substeps_behaves_like_one() {
        let rhs = |_t: f64, y: &[f64; 1]| [-y[0]];
        let a = Integrator::<1>::advance(&RungeKutta4::new(0), &rhs, 0.0, &[1.0], 0.1).unwrap();
        let b = Integrator::<1>::advance(&RungeKutta4::new(1), &rhs, 0.0, &[1.0], 0.1).unwrap();
        assert_eq!(a, b);
    }
}
