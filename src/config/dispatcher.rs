use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Notification dispatcher schedule and delivery settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DispatcherConfig {
    /// Tick interval of the summary loop
    #[serde(default = "default_interval_in_secs")]
    pub interval_in_secs: u64,

    /// No summary is pushed before this local hour (0..=23)
    #[serde(default = "default_send_after_hour")]
    pub send_after_hour: u32,

    /// Notification channel the summary payload is addressed to
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Bound on waiting for the loop to stop during shutdown
    #[serde(default = "default_shutdown_grace_in_secs")]
    pub shutdown_grace_in_secs: u64,
}

fn default_interval_in_secs() -> u64 {
    3600
}
fn default_send_after_hour() -> u32 {
    9
}
fn default_channel() -> String {
    "#test-campaign".to_string()
}
fn default_shutdown_grace_in_secs() -> u64 {
    30
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            interval_in_secs: default_interval_in_secs(),
            send_after_hour: default_send_after_hour(),
            channel: default_channel(),
            shutdown_grace_in_secs: default_shutdown_grace_in_secs(),
        }
    }
}

impl DispatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval_in_secs == 0 {
            return Err(Error::InvalidConfig(
                "dispatcher.interval_in_secs must be non-zero".into(),
            ));
        }
        if self.send_after_hour > 23 {
            return Err(Error::InvalidConfig(format!(
                "dispatcher.send_after_hour must be within 0..=23, got {}",
                self.send_after_hour
            )));
        }
        if self.channel.is_empty() {
            return Err(Error::InvalidConfig(
                "dispatcher.channel cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
