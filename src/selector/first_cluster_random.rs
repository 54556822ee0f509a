use parking_lot::Mutex;
use rand::Rng;
use tracing::debug;
use tracing::info;

use super::ConfigSelector;
use crate::constants::FIRST_CLUSTER_RANDOM_DB;
use crate::CampaignConfig;
use crate::EnvironmentConfig;
use crate::Error;
use crate::Result;

/// Reference strategy: the first configured cluster paired with a uniformly
/// random database index in `[1, N-1]` (index 0 is reserved).
///
/// The draw happens once per activation and is memoized: every registration
/// served by one activated instance receives the identical assignment until
/// the strategy is reactivated. Compatibility behavior, pinned in tests.
pub struct FirstClusterRandomDatabase {
    campaign: Mutex<Option<CampaignConfig>>,
    assigned: Mutex<Option<EnvironmentConfig>>,
}

impl FirstClusterRandomDatabase {
    pub fn new() -> Self {
        Self {
            campaign: Mutex::new(None),
            assigned: Mutex::new(None),
        }
    }
}

impl Default for FirstClusterRandomDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSelector for FirstClusterRandomDatabase {
    fn initialize(
        &self,
        campaign: &CampaignConfig,
    ) -> Result<()> {
        campaign.validate()?;
        // index 0 is reserved, so a drawable pool needs a second entry
        if campaign.databases.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "{FIRST_CLUSTER_RANDOM_DB} requires at least 2 databases, got {}",
                campaign.databases.len()
            )));
        }

        *self.campaign.lock() = Some(campaign.clone());
        *self.assigned.lock() = None;
        info!("{} initialized", FIRST_CLUSTER_RANDOM_DB);
        Ok(())
    }

    fn next_test_config(&self) -> Result<EnvironmentConfig> {
        let campaign_guard = self.campaign.lock();
        let campaign = campaign_guard
            .as_ref()
            .ok_or_else(|| Error::Fatal(format!("{FIRST_CLUSTER_RANDOM_DB} not initialized")))?;

        let mut assigned = self.assigned.lock();
        if let Some(config) = assigned.as_ref() {
            return Ok(config.clone());
        }

        let index = rand::thread_rng().gen_range(1..campaign.databases.len());
        let cluster = &campaign.clusters[0];
        debug!("{}: drew database index {}", FIRST_CLUSTER_RANDOM_DB, index);

        let config = EnvironmentConfig {
            cluster_urls: cluster.urls.clone(),
            database_name: campaign.databases[index].clone(),
            strategy_name: FIRST_CLUSTER_RANDOM_DB.to_string(),
            client_credential: cluster.credential.clone(),
        };
        *assigned = Some(config.clone());
        Ok(config)
    }

    fn name(&self) -> &'static str {
        FIRST_CLUSTER_RANDOM_DB
    }

    fn description(&self) -> &'static str {
        "First configured cluster, one random database drawn per activation"
    }
}
