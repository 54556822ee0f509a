//! In-memory campaign store.
//!
//! Mirrors the sled adapter's optimistic-concurrency semantics over plain
//! maps. Used by unit tests, which can additionally inject version conflicts
//! on demand to exercise the retry path without real contention.

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use parking_lot::RwLock;
use tracing::trace;

use crate::CampaignStore;
use crate::RecordFilter;
use crate::Result;
use crate::RoundState;
use crate::StorageError;
use crate::TestRecord;
use crate::Versioned;

#[derive(Debug, Default)]
pub struct MemoryCampaignStore {
    records: RwLock<HashMap<String, Versioned<TestRecord>>>,
    round: RwLock<Option<RoundState>>,
    inject_conflicts: AtomicUsize,
}

impl MemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` update attempts fail with a version conflict even
    /// when the caller holds the current version.
    pub fn fail_next_updates(
        &self,
        n: usize,
    ) {
        self.inject_conflicts.store(n, Ordering::SeqCst);
    }

    fn take_injected_conflict(&self) -> bool {
        self.inject_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl CampaignStore for MemoryCampaignStore {
    fn insert_record(
        &self,
        record: TestRecord,
    ) -> Result<()> {
        trace!("insert_record: {} ({})", record.name, record.id);

        let mut records = self.records.write();
        records.insert(
            record.id.clone(),
            Versioned {
                version: 1,
                value: record,
            },
        );
        Ok(())
    }

    fn latest_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Versioned<TestRecord>>> {
        let records = self.records.read();
        Ok(records
            .values()
            .filter(|v| v.value.name == name)
            .max_by_key(|v| v.value.start)
            .cloned())
    }

    fn update_record(
        &self,
        current: &Versioned<TestRecord>,
        updated: TestRecord,
    ) -> Result<Versioned<TestRecord>> {
        let conflict = || {
            StorageError::VersionConflict {
                id: current.value.id.clone(),
                expected: current.version,
            }
            .into()
        };

        if self.take_injected_conflict() {
            return Err(conflict());
        }

        let mut records = self.records.write();
        match records.get_mut(&current.value.id) {
            Some(stored) if stored.version == current.version => {
                *stored = Versioned {
                    version: current.version + 1,
                    value: updated,
                };
                Ok(stored.clone())
            }
            _ => Err(conflict()),
        }
    }

    fn query_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<TestRecord>> {
        let records = self.records.read();
        let mut matched: Vec<TestRecord> = records
            .values()
            .filter(|v| filter.matches(&v.value))
            .map(|v| v.value.clone())
            .collect();
        matched.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(matched)
    }

    fn load_round_state(&self) -> Result<Option<RoundState>> {
        Ok(*self.round.read())
    }

    fn save_round_state(
        &self,
        state: RoundState,
    ) -> Result<()> {
        *self.round.write() = Some(state);
        Ok(())
    }

    fn flush(&self) -> Result<usize> {
        Ok(0)
    }
}
