//! Authoritative collection of test records.
//!
//! The registry is a stateless request handler fronting the shared store: it
//! holds no locks across requests, and all cross-client coordination happens
//! through the store's optimistic-concurrency check. Mutations that target an
//! existing record (`unregister`, `report_event`, `archive`) identify it by
//! name and recency, re-reading and reapplying on version conflicts within the
//! configured budget.


use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;

use crate::metrics::REGISTERED_TESTS_METRIC;
use crate::metrics::REPORTED_EVENTS_METRIC;
use crate::storage::retry::retry_on_conflict;
use crate::utils::time::get_now_as_u64;
use crate::CampaignStore;
use crate::EnvironmentConfig;
use crate::Event;
use crate::EventType;
use crate::RegisterRequest;
use crate::Result;
use crate::SelectorRegistry;
use crate::TestRecord;

/// Flow-control answer to a report call. `Abort` is reserved: the current
/// coordinator always acknowledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Ok,
    Abort,
}

pub struct TestRegistry {
    store: Arc<dyn CampaignStore>,
    selectors: Arc<SelectorRegistry>,
    conflict_budget: Duration,
}

impl TestRegistry {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        selectors: Arc<SelectorRegistry>,
        conflict_budget: Duration,
    ) -> Self {
        Self {
            store,
            selectors,
            conflict_budget,
        }
    }

    /// Registers a new test run: asks the active strategy for an environment
    /// assignment, persists the record and returns the assignment.
    ///
    /// The strategy instance is held for the whole call, so a concurrent
    /// strategy switch never splits one registration.
    pub fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<EnvironmentConfig> {
        let selector = self.selectors.active();
        selector.on_before_register_test(&request.name);

        let config = selector.next_test_config()?;
        let record = TestRecord::started_now(request, config.clone());

        info!(
            "register test {} (round {}) on {}/{}",
            request.name, request.round, config.strategy_name, config.database_name
        );
        self.store.insert_record(record)?;
        REGISTERED_TESTS_METRIC
            .with_label_values(&[config.strategy_name.as_str()])
            .inc();

        Ok(config)
    }

    /// Marks the latest record for `name` finished. A no-op, not an error,
    /// when no record exists or the record is already finished.
    pub fn unregister(
        &self,
        name: &str,
        round: i64,
    ) -> Result<()> {
        debug!("unregister test {} (round {})", name, round);

        retry_on_conflict("unregister", self.conflict_budget, || {
            let Some(current) = self.store.latest_by_name(name)? else {
                debug!("unregister: no record named {}, nothing to do", name);
                return Ok(());
            };
            if current.value.finished {
                return Ok(());
            }

            let mut updated = current.value.clone();
            updated.finished = true;
            updated.end = Some(get_now_as_u64());
            self.store.update_record(&current, updated).map(|_| ())
        })?;

        self.selectors.active().on_after_unregister_test(name);
        Ok(())
    }

    /// Appends `event` to the latest record for `name`. Later reports may
    /// still land on a finished record without un-finishing it.
    pub fn report_event(
        &self,
        name: &str,
        event: Event,
    ) -> Result<ReportOutcome> {
        let event_label = match event.event_type {
            EventType::Info => "info",
            EventType::TestSuccess => "test_success",
            EventType::TestFailure => "test_failure",
        };

        retry_on_conflict("report_event", self.conflict_budget, || {
            let Some(current) = self.store.latest_by_name(name)? else {
                debug!("report_event: no record named {}, dropping event", name);
                return Ok(ReportOutcome::Ok);
            };

            let mut updated = current.value.clone();
            updated.events.push(event.clone());
            self.store.update_record(&current, updated)?;

            REPORTED_EVENTS_METRIC.with_label_values(&[event_label]).inc();
            Ok(ReportOutcome::Ok)
        })
    }

    /// Flips `archived` on the latest record for `name`, hiding it from the
    /// aggregation queries while keeping its history. No-op when absent.
    pub fn archive(
        &self,
        name: &str,
    ) -> Result<()> {
        retry_on_conflict("archive", self.conflict_budget, || {
            let Some(current) = self.store.latest_by_name(name)? else {
                return Ok(());
            };
            if current.value.archived {
                return Ok(());
            }

            let mut updated = current.value.clone();
            updated.archived = true;
            self.store.update_record(&current, updated).map(|_| ())
        })
    }

    /// The most recently started record with that name, or none.
    pub fn get_last_test_by_name(
        &self,
        name: &str,
    ) -> Result<Option<TestRecord>> {
        Ok(self.store.latest_by_name(name)?.map(|v| v.value))
    }
}
