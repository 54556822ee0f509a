//! The coordinator facade: the API surface test clients call.
//!
//! A stateless request handler fronting the shared store. Every method is a
//! thin delegation; cross-client coordination is mediated entirely by the
//! store's optimistic-concurrency check.


use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::Aggregator;
use crate::CampaignStore;
use crate::CoordinatorConfig;
use crate::DispatcherHandle;
use crate::EnvironmentConfig;
use crate::Event;
use crate::NotificationDispatcher;
use crate::NotificationSink;
use crate::RegisterRequest;
use crate::ReportOutcome;
use crate::Result;
use crate::RoundCounter;
use crate::RoundResults;
use crate::SelectorRegistry;
use crate::SledCampaignStore;
use crate::StrategyInfo;
use crate::SystemClock;
use crate::TestRecord;
use crate::TestRegistry;

pub struct Coordinator {
    config: CoordinatorConfig,
    store: Arc<dyn CampaignStore>,
    selectors: Arc<SelectorRegistry>,
    registry: TestRegistry,
    rounds: RoundCounter,
    aggregator: Aggregator,
}

impl Coordinator {
    /// Wires the coordinator on top of an existing store. Fails fast on an
    /// invalid configuration.
    pub fn new(
        config: CoordinatorConfig,
        store: Arc<dyn CampaignStore>,
    ) -> Result<Self> {
        config.validate()?;

        let selectors = Arc::new(SelectorRegistry::new(&config.campaign)?);
        let registry = TestRegistry::new(
            store.clone(),
            selectors.clone(),
            config.registry.conflict_budget(),
        );
        let rounds = RoundCounter::new(store.clone());
        let aggregator = Aggregator::new(store.clone());

        info!("coordinator ready: {:?}", selectors);
        Ok(Self {
            config,
            store,
            selectors,
            registry,
            rounds,
            aggregator,
        })
    }

    /// Opens (or creates) the sled-backed store at the configured location
    /// and wires the coordinator on top of it.
    pub fn open(config: CoordinatorConfig) -> Result<Self> {
        config.validate()?;
        let store = SledCampaignStore::open(&config.storage.db_root_dir)?;
        Self::new(config, Arc::new(store))
    }

    pub fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<EnvironmentConfig> {
        self.registry.register(request)
    }

    pub fn report_event(
        &self,
        name: &str,
        event: Event,
        _round: i64,
    ) -> Result<ReportOutcome> {
        // the record is identified by name and recency, not by round
        self.registry.report_event(name, event)
    }

    pub fn unregister(
        &self,
        name: &str,
        round: i64,
    ) -> Result<()> {
        self.registry.unregister(name, round)
    }

    pub fn get_last_test_by_name(
        &self,
        name: &str,
    ) -> Result<Option<TestRecord>> {
        self.registry.get_last_test_by_name(name)
    }

    pub fn archive_test(
        &self,
        name: &str,
    ) -> Result<()> {
        self.registry.archive(name)
    }

    pub fn get_failing_tests(&self) -> Result<Vec<TestRecord>> {
        self.aggregator.get_failing_tests()
    }

    pub fn get_round_results(
        &self,
        round: i64,
    ) -> Result<RoundResults> {
        self.aggregator.get_round_results(round)
    }

    pub fn get_round(&self) -> Result<i64> {
        self.rounds.get()
    }

    pub fn set_round(
        &self,
        round: i64,
    ) -> Result<i64> {
        self.rounds.set(round)
    }

    pub fn list_selector_strategies(&self) -> Vec<StrategyInfo> {
        self.selectors.list()
    }

    pub fn set_active_strategy(
        &self,
        name: &str,
    ) -> Result<bool> {
        self.selectors.set_active(name)
    }

    /// Synchronously flushes the store.
    pub fn flush(&self) -> Result<usize> {
        self.store.flush()
    }

    /// Spawns the notification loop on the current tokio runtime and returns
    /// its join mechanism.
    pub fn start_dispatcher(
        &self,
        sink: Arc<dyn NotificationSink>,
    ) -> DispatcherHandle {
        let dispatcher = NotificationDispatcher::new(
            self.rounds.clone(),
            self.aggregator.clone(),
            sink,
            Arc::new(SystemClock),
            self.config.dispatcher.clone(),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(dispatcher.run(cancel.clone()));
        DispatcherHandle::new(
            cancel,
            handle,
            std::time::Duration::from_secs(self.config.dispatcher.shutdown_grace_in_secs),
        )
    }
}
