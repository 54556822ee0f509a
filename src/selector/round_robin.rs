use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use tracing::info;

use super::ConfigSelector;
use crate::constants::ROUND_ROBIN_CLUSTER;
use crate::CampaignConfig;
use crate::EnvironmentConfig;
use crate::Error;
use crate::Result;

/// Cycles through the configured clusters, one per registration, always
/// paired with database index 0.
pub struct RoundRobinCluster {
    campaign: Mutex<Option<CampaignConfig>>,
    cursor: AtomicUsize,
}

impl RoundRobinCluster {
    pub fn new() -> Self {
        Self {
            campaign: Mutex::new(None),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Default for RoundRobinCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSelector for RoundRobinCluster {
    fn initialize(
        &self,
        campaign: &CampaignConfig,
    ) -> Result<()> {
        campaign.validate()?;
        *self.campaign.lock() = Some(campaign.clone());
        self.cursor.store(0, Ordering::SeqCst);
        info!("{} initialized", ROUND_ROBIN_CLUSTER);
        Ok(())
    }

    fn next_test_config(&self) -> Result<EnvironmentConfig> {
        let campaign_guard = self.campaign.lock();
        let campaign = campaign_guard
            .as_ref()
            .ok_or_else(|| Error::Fatal(format!("{ROUND_ROBIN_CLUSTER} not initialized")))?;

        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % campaign.clusters.len();
        let cluster = &campaign.clusters[index];

        Ok(EnvironmentConfig {
            cluster_urls: cluster.urls.clone(),
            database_name: campaign.databases[0].clone(),
            strategy_name: ROUND_ROBIN_CLUSTER.to_string(),
            client_credential: cluster.credential.clone(),
        })
    }

    fn name(&self) -> &'static str {
        ROUND_ROBIN_CLUSTER
    }

    fn description(&self) -> &'static str {
        "Cycles the configured clusters per registration, database index 0"
    }
}
