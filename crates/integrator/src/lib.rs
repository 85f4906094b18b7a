//! Explicit ODE integration over an explicit array of output times.
//!
//! Callers supply a derivative function `f(t, y)` and the sample times they
//! want reported. Every [`Integrator`] lands exactly on each requested time,
//! so the output always has one state per sample regardless of the internal
//! step size the method chooses.

mod adaptive;
mod control;
mod grid;
mod rk4;

use std::str::FromStr;

use thiserror::Error;

pub use adaptive::AdaptiveRk4;
pub use control::{CancellationToken, RunControl};
pub use grid::sample_times;
pub use rk4::RungeKutta4;

/// Right-hand side of `dy/dt = f(t, y)`.
pub type Rhs<'a, const N: usize> = dyn Fn(f64, &[f64; N]) -> [f64; N] + 'a;

/// Errors raised while advancing a solution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("integration cancelled at t = {time} s")]
    Cancelled { time: f64 },
    #[error("integration deadline exceeded at t = {time} s")]
    DeadlineExceeded { time: f64 },
    #[error("state became non-finite at t = {time} s")]
    NonFiniteState { time: f64 },
    #[error("step size {step:e} s fell below the minimum at t = {time} s")]
    StepSizeUnderflow { time: f64, step: f64 },
    #[error("sample times must be finite and strictly increasing (index {index})")]
    UnorderedTimes { index: usize },
}

/// A one-step method able to carry a state from `t0` to exactly `t1`.
pub trait Integrator<const N: usize>: Send + Sync {
    /// Short identifier used in logs and export metadata.
    fn name(&self) -> &'static str;

    /// Advance `y0` from `t0` to `t1` (with `t1 > t0`).
    fn advance(
        &self,
        rhs: &Rhs<'_, N>,
        t0: f64,
        y0: &[f64; N],
        t1: f64,
    ) -> Result<[f64; N], IntegrationError>;
}

/// Config-facing selector for the available methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntegrationMethod {
    Adaptive(AdaptiveRk4),
    Rk4(RungeKutta4),
}

impl Default for IntegrationMethod {
    fn default() -> Self {
        IntegrationMethod::Adaptive(AdaptiveRk4::default())
    }
}

impl IntegrationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            IntegrationMethod::Adaptive(_) => adaptive::NAME,
            IntegrationMethod::Rk4(_) => rk4::NAME,
        }
    }

    /// Boxed integrator for an `N`-dimensional system.
    pub fn integrator<const N: usize>(&self) -> Box<dyn Integrator<N>> {
        match *self {
            IntegrationMethod::Adaptive(method) => Box::new(method),
            IntegrationMethod::Rk4(method) => Box::new(method),
        }
    }
}

/// Unrecognised method name.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown integration method '{0}' (expected 'adaptive' or 'rk4')")]
pub struct UnknownMethod(pub String);

impl FromStr for IntegrationMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" | "rk45" => Ok(IntegrationMethod::Adaptive(AdaptiveRk4::default())),
            "rk4" => Ok(IntegrationMethod::Rk4(RungeKutta4::default())),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Integrate `rhs` from `y0` at `times[0]`, returning one state per entry of `times`.
///
/// The first returned state is `y0` itself. `control` is checked before every
/// sample interval.
pub fn solve<const N: usize>(
    integrator: &dyn Integrator<N>,
    rhs: &Rhs<'_, N>,
    y0: [f64; N],
    times: &[f64],
    control: &RunControl,
) -> Result<Vec<[f64; N]>, IntegrationError> {
    let Some(&t_start) = times.first() else {
        return Ok(Vec::new());
    };
    if !t_start.is_finite() {
        return Err(IntegrationError::UnorderedTimes { index: 0 });
    }
    if !is_finite(&y0) {
        return Err(IntegrationError::NonFiniteState { time: t_start });
    }

    log::debug!(
        "integrating {} samples over [{}, {}] s with {}",
        times.len(),
        t_start,
        times[times.len() - 1],
        integrator.name()
    );

    let mut states = Vec::with_capacity(times.len());
    states.push(y0);
    let mut y = y0;
    for (index, pair) in times.windows(2).enumerate() {
        let (t0, t1) = (pair[0], pair[1]);
        if !(t1.is_finite() && t1 > t0) {
            return Err(IntegrationError::UnorderedTimes { index: index + 1 });
        }
        control.check(t0)?;
        y = integrator.advance(rhs, t0, &y, t1)?;
        if !is_finite(&y) {
            return Err(IntegrationError::NonFiniteState { time: t1 });
        }
        states.push(y);
    }
    Ok(states)
}

pub(crate) fn is_finite<const N: usize>(y: &[f64; N]) -> bool {
    y.iter().all(|v| v.is_finite())
}
