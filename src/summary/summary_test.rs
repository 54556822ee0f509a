use std::sync::Arc;

use super::*;
use crate::storage::storage_suite::sample_record;
use crate::Event;
use crate::EventType;
use crate::MemoryCampaignStore;

struct Fixture {
    store: Arc<MemoryCampaignStore>,
    aggregator: Aggregator,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(MemoryCampaignStore::new());
        let aggregator = Aggregator::new(store.clone());
        Self { store, aggregator }
    }

    fn add(
        &self,
        name: &str,
        round: i64,
        start: u64,
        finished: bool,
        events: Vec<Event>,
    ) {
        let mut record = sample_record(name, round, start);
        record.finished = finished;
        record.events = events;
        self.store.insert_record(record).unwrap();
    }
}

fn info(message: &str) -> Event {
    Event::new(EventType::Info, message)
}
fn success() -> Event {
    Event::new(EventType::TestSuccess, "passed")
}
fn failure() -> Event {
    Event::new(EventType::TestFailure, "failed")
}

#[test]
fn failing_tests_should_include_failure_events_and_missing_successes() {
    let f = Fixture::new();
    f.add("has-failure", 1, 100, true, vec![info("x"), failure()]);
    f.add("passed", 1, 200, true, vec![info("x"), success()]);
    f.add("late-failure", 1, 300, true, vec![info("x"), success(), failure()]);
    f.add("no-verdict", 1, 400, true, vec![info("x")]);

    let failing = f.aggregator.get_failing_tests().unwrap();

    let names: Vec<&str> = failing.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["no-verdict", "late-failure", "has-failure"]);
}

#[test]
fn failing_tests_should_be_ordered_by_start_descending() {
    let f = Fixture::new();
    f.add("a", 1, 100, true, vec![failure()]);
    f.add("b", 1, 300, true, vec![failure()]);
    f.add("c", 1, 200, true, vec![failure()]);

    let failing = f.aggregator.get_failing_tests().unwrap();

    let starts: Vec<u64> = failing.iter().map(|r| r.start).collect();
    assert_eq!(starts, vec![300, 200, 100]);
}

#[test]
fn round_results_should_summarize_one_round_only() {
    let f = Fixture::new();
    // round 3: 3 finished successes, 1 finished failure, 1 still running
    f.add("ok-1", 3, 100, true, vec![success()]);
    f.add("ok-2", 3, 110, true, vec![success()]);
    f.add("ok-3", 3, 120, true, vec![success()]);
    f.add("broken", 3, 130, true, vec![failure()]);
    f.add("slow", 3, 140, false, vec![info("still going")]);
    // other rounds are out of scope
    f.add("other-round", 4, 150, true, vec![failure()]);

    let results = f.aggregator.get_round_results(3).unwrap();

    assert_eq!(results.total_tests_in_round, 5);
    assert_eq!(results.total_failures, 1);
    assert_eq!(results.unique_fail_count, 1);
    assert_eq!(results.total_still_running, 1);
    assert_eq!(results.failing[0].name, "broken");
    assert_eq!(results.still_running[0].name, "slow");
}

#[test]
fn round_results_for_empty_round_should_be_all_zero() {
    let f = Fixture::new();

    let results = f.aggregator.get_round_results(9).unwrap();

    assert_eq!(results.total_tests_in_round, 0);
    assert_eq!(results.total_failures, 0);
    assert_eq!(results.unique_fail_count, 0);
    assert_eq!(results.total_still_running, 0);
}

#[test]
fn archived_records_should_be_invisible_to_aggregation() {
    let f = Fixture::new();
    let mut record = sample_record("hidden", 1, 100);
    record.archived = true;
    record.events = vec![failure()];
    f.store.insert_record(record).unwrap();

    assert!(f.aggregator.get_failing_tests().unwrap().is_empty());
    assert_eq!(f.aggregator.get_round_results(1).unwrap().total_tests_in_round, 0);
}
