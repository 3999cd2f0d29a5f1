//! Outbox dispatch configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Polling and bounding of the outbox dispatcher
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxConfig {
    /// Interval between dispatch ticks in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Maximum records per tick; unbounded when unset
    #[serde(default)]
    pub batch_size: Option<u32>,

    /// Records that failed this many times are no longer fetched
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl OutboxConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate outbox configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.batch_size == Some(0) {
            return Err(ValidationError::InvalidOutboxBound("batch_size"));
        }
        if self.max_attempts == Some(0) {
            return Err(ValidationError::InvalidOutboxBound("max_attempts"));
        }
        Ok(())
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            batch_size: None,
            max_attempts: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    10_000
}
