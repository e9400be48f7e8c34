use std::time::Duration;

use crate::error::{Error, Result};

/// Run shape as requested by the user; every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub vus: Option<u64>,
    pub iterations: Option<u64>,
    pub duration: Option<Duration>,
}

/// Validated run shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub vus: u64,
    /// Shared iteration budget across all VUs. `None` means "until the duration elapses".
    pub iterations: Option<u64>,
    pub duration: Option<Duration>,
}

impl RunConfig {
    pub fn resolve(self) -> Result<RunPlan> {
        let vus = self.vus.unwrap_or(1);
        if vus == 0 {
            return Err(Error::InvalidVus);
        }

        if self.duration.is_some_and(|d| d.is_zero()) {
            return Err(Error::InvalidDuration);
        }

        // Default iterations is 1 unless duration mode is used.
        let iterations = self
            .iterations
            .or_else(|| self.duration.is_none().then_some(1));
        if iterations == Some(0) {
            return Err(Error::InvalidIterations);
        }

        Ok(RunPlan {
            vus,
            iterations,
            duration: self.duration,
        })
    }
}
