use std::sync::Arc;

use super::*;
use crate::MemoryCampaignStore;

#[test]
fn get_on_fresh_store_should_initialize_and_persist_round_one() {
    let store = Arc::new(MemoryCampaignStore::new());
    let counter = RoundCounter::new(store.clone());

    assert_eq!(counter.get().unwrap(), 1);
    assert_eq!(store.load_round_state().unwrap().unwrap().round, 1);
}

#[test]
fn second_get_should_read_the_persisted_singleton() {
    let store = Arc::new(MemoryCampaignStore::new());
    let counter = RoundCounter::new(store.clone());

    assert_eq!(counter.get().unwrap(), 1);
    assert_eq!(counter.get().unwrap(), 1);
}

#[test]
fn set_should_overwrite_and_return_the_stored_value() {
    let store = Arc::new(MemoryCampaignStore::new());
    let counter = RoundCounter::new(store);

    assert_eq!(counter.set(5).unwrap(), 5);
    assert_eq!(counter.get().unwrap(), 5);
}

#[test]
fn set_should_allow_moving_the_round_backward_without_clamping() {
    let store = Arc::new(MemoryCampaignStore::new());
    let counter = RoundCounter::new(store);

    counter.set(5).unwrap();
    assert_eq!(counter.set(0).unwrap(), 0);
    assert_eq!(counter.get().unwrap(), 0);
}
