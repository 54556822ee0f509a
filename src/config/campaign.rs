use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// One target cluster reachable by test clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClusterEndpoints {
    /// Ordered list of endpoint URLs
    pub urls: Vec<String>,

    /// Optional client credential handed out with assignments
    #[serde(default)]
    pub credential: Option<String>,
}

/// Pool of clusters and databases the selector strategies assign from.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CampaignConfig {
    #[serde(default)]
    pub clusters: Vec<ClusterEndpoints>,

    /// Database names available for assignment. Index 0 is reserved and never
    /// handed out by the random strategy.
    #[serde(default)]
    pub databases: Vec<String>,
}

impl CampaignConfig {
    /// Validates pool consistency
    /// # Errors
    /// Returns `Error::InvalidConfig` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.clusters.is_empty() {
            return Err(Error::InvalidConfig(
                "campaign.clusters must contain at least one cluster".into(),
            ));
        }

        for (i, cluster) in self.clusters.iter().enumerate() {
            if cluster.urls.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "campaign.clusters[{i}] must list at least one endpoint url"
                )));
            }
        }

        if self.databases.is_empty() {
            return Err(Error::InvalidConfig(
                "campaign.databases must contain at least one database name".into(),
            ));
        }

        let mut names = std::collections::HashSet::new();
        for database in &self.databases {
            if !names.insert(database.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "Duplicate database name {database} in campaign.databases"
                )));
            }
        }

        Ok(())
    }
}
