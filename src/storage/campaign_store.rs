//! Persistence collaborator for campaign state.
//!
//! All cross-client coordination is mediated by the store's
//! optimistic-concurrency check: a mutation reads a versioned record, computes
//! a new value and commits conditioned on the version being unchanged since
//! the read. A mismatch rejects the commit with
//! [`StorageError::VersionConflict`](crate::StorageError::VersionConflict).

use serde::Deserialize;
use serde::Serialize;

use crate::Result;
use crate::RoundState;
use crate::TestRecord;

#[cfg(test)]
use mockall::automock;

/// A stored value together with the version observed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Simple equality predicates over test records. Archived records never match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub name: Option<String>,
    pub round: Option<i64>,
    pub author: Option<String>,
    pub finished: Option<bool>,
}

impl RecordFilter {
    pub fn by_round(round: i64) -> Self {
        Self {
            round: Some(round),
            ..Default::default()
        }
    }

    pub(crate) fn matches(
        &self,
        record: &TestRecord,
    ) -> bool {
        if record.archived {
            return false;
        }
        if let Some(name) = &self.name {
            if &record.name != name {
                return false;
            }
        }
        if let Some(round) = self.round {
            if record.round != round {
                return false;
            }
        }
        if let Some(author) = &self.author {
            if &record.author != author {
                return false;
            }
        }
        if let Some(finished) = self.finished {
            if record.finished != finished {
                return false;
            }
        }
        true
    }
}

#[cfg_attr(test, automock)]
pub trait CampaignStore: Send + Sync + 'static {
    /// Persists a freshly registered record under its id.
    fn insert_record(
        &self,
        record: TestRecord,
    ) -> Result<()>;

    /// The most recently started record with this name, with its version, or
    /// none. Archived records are still visible here since they remain the
    /// implicit target of mutations.
    fn latest_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Versioned<TestRecord>>>;

    /// Conditional commit: succeeds only if the stored version still equals
    /// `current.version`, otherwise fails with a version conflict and the
    /// caller must retry from a fresh read.
    fn update_record(
        &self,
        current: &Versioned<TestRecord>,
        updated: TestRecord,
    ) -> Result<Versioned<TestRecord>>;

    /// Matching records ordered by start descending.
    fn query_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<TestRecord>>;

    fn load_round_state(&self) -> Result<Option<RoundState>>;

    /// Unconditional overwrite of the round singleton.
    fn save_round_state(
        &self,
        state: RoundState,
    ) -> Result<()>;

    /// Synchronously flushes dirty buffers; returns the number of bytes
    /// flushed where the engine reports it.
    fn flush(&self) -> Result<usize>;
}
