//! Batch execution settings shared across crates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Concurrency and deadline settings for one fan-out call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of requests in flight simultaneously (>= 1)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Deadline for the whole batch in seconds (None = no deadline)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

fn default_max_concurrent() -> usize {
    5
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BatchConfig {
    /// Batch deadline as a `Duration`, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Settings with no deadline, for callers that manage their own
    pub fn unbounded_time(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            timeout_secs: None,
        }
    }
}
