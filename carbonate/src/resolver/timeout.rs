//! Timeout tracking for resolution

use crate::{CarbonateError, ResourceLimits};
use std::time::Instant;

/// Tracks elapsed time since a resolution request started
pub struct TimeoutTracker {
    start_time: Instant,
}

impl TimeoutTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Returns an error once elapsed time exceeds `max_resolution_time_ms`
    pub fn check_timeout(&self, limits: &ResourceLimits) -> Result<(), CarbonateError> {
        let elapsed_ms = self.start_time.elapsed().as_millis() as u64;
        if elapsed_ms > limits.max_resolution_time_ms {
            return Err(CarbonateError::ResourceLimitExceeded {
                limit_name: "max_resolution_time_ms".to_string(),
                limit_value: limits.max_resolution_time_ms.to_string(),
                actual_value: elapsed_ms.to_string(),
                suggestion: format!(
                    "Resolution took {}ms, exceeding the limit of {}ms. Check the rule set for expensive compute functions or raise the limit.",
                    elapsed_ms, limits.max_resolution_time_ms
                ),
            });
        }
        Ok(())
    }
}

impl Default for TimeoutTracker {
    fn default() -> Self {
        Self::new()
    }
}
