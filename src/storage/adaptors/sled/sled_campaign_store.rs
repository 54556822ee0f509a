//! Sled-backed campaign store.
//!
//! Records live in one tree keyed by record id; the round singleton lives in
//! its own tree. Optimistic concurrency maps onto sled's `compare_and_swap`
//! over the serialized `Versioned<TestRecord>` bytes: the version bump changes
//! the bytes, so a racing commit makes the swap fail.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::constants::ROUND_STATE_KEY;
use crate::constants::ROUND_STATE_TREE;
use crate::constants::TEST_RECORD_TREE;
use crate::init_sled_campaign_db;
use crate::CampaignStore;
use crate::RecordFilter;
use crate::Result;
use crate::RoundState;
use crate::StorageError;
use crate::TestRecord;
use crate::Versioned;

#[derive(Clone)]
pub struct SledCampaignStore {
    #[allow(dead_code)]
    db: Arc<sled::Db>,
    records: Arc<sled::Tree>,
    rounds: Arc<sled::Tree>,
}

impl std::fmt::Debug for SledCampaignStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledCampaignStore")
            .field("records_len", &self.records.len())
            .finish()
    }
}

impl SledCampaignStore {
    pub fn new(db: sled::Db) -> Result<Self> {
        let records = db.open_tree(TEST_RECORD_TREE).map_err(StorageError::Sled)?;
        let rounds = db.open_tree(ROUND_STATE_TREE).map_err(StorageError::Sled)?;
        Ok(Self {
            db: Arc::new(db),
            records: Arc::new(records),
            rounds: Arc::new(rounds),
        })
    }

    pub fn open(db_root_dir: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let db = init_sled_campaign_db(db_root_dir).map_err(StorageError::Io)?;
        Self::new(db)
    }

    fn decode(bytes: &[u8]) -> Result<Versioned<TestRecord>> {
        Ok(bincode::deserialize(bytes).map_err(StorageError::Bincode)?)
    }

    fn encode(versioned: &Versioned<TestRecord>) -> Result<Vec<u8>> {
        Ok(bincode::serialize(versioned).map_err(StorageError::Bincode)?)
    }
}

impl CampaignStore for SledCampaignStore {
    fn insert_record(
        &self,
        record: TestRecord,
    ) -> Result<()> {
        debug!("insert_record: {} ({})", record.name, record.id);

        let versioned = Versioned {
            version: 1,
            value: record,
        };
        let bytes = Self::encode(&versioned)?;
        self.records
            .insert(versioned.value.id.as_bytes(), bytes)
            .map_err(StorageError::Sled)?;
        self.records.flush().map_err(StorageError::Sled)?;
        Ok(())
    }

    fn latest_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Versioned<TestRecord>>> {
        let mut latest: Option<Versioned<TestRecord>> = None;
        for entry in self.records.iter() {
            let (_, bytes) = entry.map_err(StorageError::Sled)?;
            let versioned = Self::decode(&bytes)?;
            if versioned.value.name != name {
                continue;
            }
            match &latest {
                Some(current) if current.value.start >= versioned.value.start => {}
                _ => latest = Some(versioned),
            }
        }
        Ok(latest)
    }

    fn update_record(
        &self,
        current: &Versioned<TestRecord>,
        updated: TestRecord,
    ) -> Result<Versioned<TestRecord>> {
        let old_bytes = Self::encode(current)?;
        let next = Versioned {
            version: current.version + 1,
            value: updated,
        };
        let new_bytes = Self::encode(&next)?;

        let swap = self
            .records
            .compare_and_swap(
                current.value.id.as_bytes(),
                Some(old_bytes),
                Some(new_bytes),
            )
            .map_err(StorageError::Sled)?;

        match swap {
            Ok(()) => {
                self.records.flush().map_err(StorageError::Sled)?;
                Ok(next)
            }
            Err(_cas) => Err(StorageError::VersionConflict {
                id: current.value.id.clone(),
                expected: current.version,
            }
            .into()),
        }
    }

    fn query_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<TestRecord>> {
        let mut matched = Vec::new();
        for entry in self.records.iter() {
            let (_, bytes) = entry.map_err(StorageError::Sled)?;
            let versioned = Self::decode(&bytes)?;
            if filter.matches(&versioned.value) {
                matched.push(versioned.value);
            }
        }
        matched.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(matched)
    }

    fn load_round_state(&self) -> Result<Option<RoundState>> {
        match self.rounds.get(ROUND_STATE_KEY).map_err(StorageError::Sled)? {
            Some(bytes) => {
                let state = bincode::deserialize(&bytes).map_err(StorageError::Bincode)?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn save_round_state(
        &self,
        state: RoundState,
    ) -> Result<()> {
        let bytes = bincode::serialize(&state).map_err(StorageError::Bincode)?;
        self.rounds
            .insert(ROUND_STATE_KEY, bytes)
            .map_err(StorageError::Sled)?;
        self.rounds.flush().map_err(StorageError::Sled)?;
        Ok(())
    }

    fn flush(&self) -> Result<usize> {
        let mut flushed = self.records.flush().map_err(StorageError::Sled)?;
        flushed += self.rounds.flush().map_err(StorageError::Sled)?;
        Ok(flushed)
    }
}
