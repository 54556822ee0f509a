//! Configuration management for the campaign coordinator.
//!
//! Loading priority, lowest to highest:
//! 1. Default values (hardcoded)
//! 2. Optional TOML config file
//! 3. Environment variables (prefix `CAMPAIGN`, separator `__`)

mod campaign;
mod dispatcher;
mod registry;
mod storage;

pub use campaign::*;
pub use dispatcher::*;
pub use registry::*;
pub use storage::*;


use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CoordinatorConfig {
    /// Target clusters and database pool available for assignment
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Registry conflict-retry policy
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Notification dispatcher schedule
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Persistent store location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CoordinatorConfig {
    /// Merge defaults, an optional config file and `CAMPAIGN__*` environment
    /// overrides (highest priority).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CAMPAIGN")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: CoordinatorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the merged configuration. Fails fast before any component
    /// is constructed.
    pub fn validate(&self) -> Result<()> {
        self.campaign.validate()?;
        self.registry.validate()?;
        self.dispatcher.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}
