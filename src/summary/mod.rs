//! Read-only aggregation queries over test records.
//!
//! Queries run against the store's current view in a single pass; a
//! just-committed event may not be visible yet, which is tolerated rather
//! than blocking for stronger reads.

#[cfg(test)]
mod summary_test;

use std::sync::Arc;

use tracing::debug;

use crate::CampaignStore;
use crate::RecordFilter;
use crate::Result;
use crate::RoundResults;
use crate::TestRecord;

#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn CampaignStore>,
}

impl Aggregator {
    pub fn new(store: Arc<dyn CampaignStore>) -> Self {
        Self { store }
    }

    /// Every record that never reported a success or reported at least one
    /// failure, ordered by start descending.
    pub fn get_failing_tests(&self) -> Result<Vec<TestRecord>> {
        let mut records = self.store.query_records(&RecordFilter::default())?;
        records.retain(|r| r.is_failing());
        Ok(records)
    }

    /// Health summary scoped to one round.
    pub fn get_round_results(
        &self,
        round: i64,
    ) -> Result<RoundResults> {
        let records = self.store.query_records(&RecordFilter::by_round(round))?;
        debug!("round {} has {} records", round, records.len());
        Ok(RoundResults::from_records(round, records))
    }
}
