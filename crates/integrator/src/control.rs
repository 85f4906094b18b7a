use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::IntegrationError;

/// Shared flag that asks a running integration to stop at its next sample.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional stop conditions checked once per sample interval.
///
/// The default never interrupts a run.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancellation: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl RunControl {
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fail if cancellation was requested or the deadline has passed.
    pub fn check(&self, time: f64) -> Result<(), IntegrationError> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            log::warn!("integration cancelled at t = {time} s");
            return Err(IntegrationError::Cancelled { time });
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            log::warn!("integration deadline exceeded at t = {time} s");
            return Err(IntegrationError::DeadlineExceeded { time });
        }
        Ok(())
    }
}
