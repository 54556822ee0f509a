//! Process-wide campaign generation counter.
//!
//! Backed by the round singleton in the store. No serialization beyond the
//! atomicity of a single store read or write: an atomic increment would need
//! a read-then-write sequence and accepts the inherent race.

#[cfg(test)]
mod round_test;

use std::sync::Arc;

use tracing::info;

use crate::CampaignStore;
use crate::Result;
use crate::RoundState;

#[derive(Clone)]
pub struct RoundCounter {
    store: Arc<dyn CampaignStore>,
}

impl RoundCounter {
    pub fn new(store: Arc<dyn CampaignStore>) -> Self {
        Self { store }
    }

    /// Current round; lazily initializes (and persists) round 1 on first read
    /// of a fresh store. Never returns less than 1 on that path.
    pub fn get(&self) -> Result<i64> {
        if let Some(state) = self.store.load_round_state()? {
            return Ok(state.round);
        }

        let initial = RoundState { round: 1 };
        self.store.save_round_state(initial)?;
        info!("round state initialized to {}", initial.round);
        Ok(initial.round)
    }

    /// Unconditional overwrite, returned as stored. No monotonicity or
    /// clamping: callers may move the round backward intentionally.
    pub fn set(
        &self,
        round: i64,
    ) -> Result<i64> {
        self.store.save_round_state(RoundState { round })?;
        info!("round state set to {}", round);
        Ok(round)
    }
}
