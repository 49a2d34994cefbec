use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the comparison worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Wall-clock limit for one comparison, in milliseconds.
    pub timeout_ms: u64,
}

impl WorkerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}
