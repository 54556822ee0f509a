//! Environment-assignment strategies.
//!
//! Exactly one strategy is active process-wide, held behind an [`ArcSwap`] in
//! [`SelectorRegistry`]. Switching activates a fresh strategy instance, so any
//! per-activation state (such as the random strategy's memoized draw) resets.
//! A registration in flight sees either the old or the new strategy fully; the
//! switch itself is not fenced against racing registrations.
//!
//! The strategy set is a closed, compile-time registry mapping a tag to a
//! factory function.

mod first_cluster_random;
mod round_robin;

pub use first_cluster_random::*;
pub use round_robin::*;

#[cfg(test)]
mod selector_test;

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tracing::info;

use crate::constants::FIRST_CLUSTER_RANDOM_DB;
use crate::constants::ROUND_ROBIN_CLUSTER;
use crate::CampaignConfig;
use crate::EnvironmentConfig;
use crate::Result;

/// An environment-assignment policy.
///
/// `initialize` must fail fast on an unusable pool (zero clusters or zero
/// databases); `next_test_config` is side-effect-free to the caller. The two
/// lifecycle hooks are no-ops in the bundled strategies but are part of the
/// contract for future ones.
pub trait ConfigSelector: Send + Sync {
    fn initialize(
        &self,
        campaign: &CampaignConfig,
    ) -> Result<()>;

    fn next_test_config(&self) -> Result<EnvironmentConfig>;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn on_before_register_test(
        &self,
        _test_name: &str,
    ) {
    }

    fn on_after_unregister_test(
        &self,
        _test_name: &str,
    ) {
    }
}

type SelectorFactory = fn() -> Arc<dyn ConfigSelector>;

/// Sized holder so the trait object fits behind an `ArcSwap`.
struct ActiveStrategy(Arc<dyn ConfigSelector>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyInfo {
    pub name: String,
    pub description: String,
}

/// Holder of the strategy set and the active-strategy pointer.
pub struct SelectorRegistry {
    factories: DashMap<&'static str, SelectorFactory>,
    active: ArcSwap<ActiveStrategy>,
    campaign: CampaignConfig,
}

impl SelectorRegistry {
    /// Builds the compile-time strategy set and activates the default
    /// (first-cluster random database) strategy.
    pub fn new(campaign: &CampaignConfig) -> Result<Self> {
        let default_factory: SelectorFactory = || Arc::new(FirstClusterRandomDatabase::new());

        let factories: DashMap<&'static str, SelectorFactory> = DashMap::new();
        factories.insert(FIRST_CLUSTER_RANDOM_DB, default_factory);
        factories.insert(ROUND_ROBIN_CLUSTER, || Arc::new(RoundRobinCluster::new()));

        let default = default_factory();
        default.initialize(campaign)?;

        Ok(Self {
            factories,
            active: ArcSwap::from_pointee(ActiveStrategy(default)),
            campaign: campaign.clone(),
        })
    }

    /// The currently active strategy. Callers hold the returned instance for
    /// the whole registration so a concurrent switch never splits one call.
    pub fn active(&self) -> Arc<dyn ConfigSelector> {
        self.active.load().0.clone()
    }

    /// Activates a fresh instance of the named strategy. Returns false when
    /// the name is unknown; initialization failures are surfaced.
    pub fn set_active(
        &self,
        name: &str,
    ) -> Result<bool> {
        let Some(factory) = self.factories.get(name).map(|f| *f.value()) else {
            return Ok(false);
        };

        let strategy = factory();
        strategy.initialize(&self.campaign)?;
        info!("activating selector strategy: {}", strategy.name());
        self.active.store(Arc::new(ActiveStrategy(strategy)));
        Ok(true)
    }

    /// Names and descriptions of every registered strategy, sorted by name.
    pub fn list(&self) -> Vec<StrategyInfo> {
        let mut strategies: Vec<StrategyInfo> = self
            .factories
            .iter()
            .map(|entry| {
                let strategy = (entry.value())();
                StrategyInfo {
                    name: strategy.name().to_string(),
                    description: strategy.description().to_string(),
                }
            })
            .collect();
        strategies.sort_by(|a, b| a.name.cmp(&b.name));
        strategies
    }
}

impl std::fmt::Debug for SelectorRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SelectorRegistry")
            .field("active", &self.active.load().0.name())
            .field("strategies", &self.factories.len())
            .finish()
    }
}
