use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Conflict-retry policy for registry mutations.
///
/// Version conflicts are retried immediately from a fresh read; once the
/// cumulative elapsed time exceeds the budget, the conflict escalates to a
/// fatal error instead of feeding a retry storm.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct RegistryConfig {
    #[serde(default = "default_conflict_retry_timeout_in_ms")]
    pub conflict_retry_timeout_in_ms: u64,
}

fn default_conflict_retry_timeout_in_ms() -> u64 {
    30_000
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            conflict_retry_timeout_in_ms: default_conflict_retry_timeout_in_ms(),
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.conflict_retry_timeout_in_ms == 0 {
            return Err(Error::InvalidConfig(
                "registry.conflict_retry_timeout_in_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn conflict_budget(&self) -> Duration {
        Duration::from_millis(self.conflict_retry_timeout_in_ms)
    }
}
