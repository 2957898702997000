//! Wall-clock budget for the still-image pipeline
//!
//! The budget is polled, not enforced: stages call [`Deadline::check`]
//! between steps and per row, so a single decode or resize call always runs
//! to completion before an overrun is reported.

use std::time::{Duration, Instant};

use log::warn;

use crate::{AnalysisError, Result};

/// A point in time after which processing is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Budget starting now
    pub fn after(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A budget that never expires in practice
    pub fn unbounded() -> Self {
        Self::after(Duration::from_secs(u64::MAX / 4))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.limit
    }

    /// Fail with `ProcessingTimeout` if the budget is spent
    pub fn check(&self, operation: &str) -> Result<()> {
        let elapsed = self.elapsed();
        if elapsed <= self.limit {
            return Ok(());
        }

        warn!(
            "{} exceeded processing budget ({}ms > {}ms)",
            operation,
            elapsed.as_millis(),
            self.limit.as_millis()
        );
        Err(AnalysisError::ProcessingTimeout {
            operation: operation.to_string(),
            duration_ms: elapsed.as_millis() as u64,
            limit_ms: self.limit.as_millis() as u64,
        })
    }
}
