//! Shared behavioral suite run against every campaign store adapter.

use crate::CampaignStore;
use crate::EnvironmentConfig;
use crate::Event;
use crate::EventType;
use crate::RecordFilter;
use crate::RegisterRequest;
use crate::RoundState;
use crate::TestRecord;

pub(crate) fn sample_record(
    name: &str,
    round: i64,
    start: u64,
) -> TestRecord {
    let request = RegisterRequest {
        name: name.to_string(),
        class_name: "SmokeSuite".to_string(),
        author: "alice".to_string(),
        round,
        correlation_token: None,
    };
    let config = EnvironmentConfig {
        cluster_urls: vec!["http://c0-a:8080".to_string()],
        database_name: "db1".to_string(),
        strategy_name: "first-cluster-random-db".to_string(),
        client_credential: None,
    };
    let mut record = TestRecord::started_now(&request, config);
    record.start = start;
    record
}

pub(crate) fn suite_insert_then_latest_by_name(store: &dyn CampaignStore) {
    assert!(store.latest_by_name("T1").unwrap().is_none());

    store.insert_record(sample_record("T1", 1, 100)).unwrap();
    store.insert_record(sample_record("T1", 2, 200)).unwrap();
    store.insert_record(sample_record("other", 2, 300)).unwrap();

    let latest = store.latest_by_name("T1").unwrap().expect("record exists");
    assert_eq!(latest.value.name, "T1");
    assert_eq!(latest.value.start, 200);
    assert_eq!(latest.version, 1);
}

pub(crate) fn suite_update_bumps_version_and_persists(store: &dyn CampaignStore) {
    store.insert_record(sample_record("T1", 1, 100)).unwrap();

    let current = store.latest_by_name("T1").unwrap().unwrap();
    let mut updated = current.value.clone();
    updated.events.push(Event::new(EventType::Info, "progress"));

    let next = store.update_record(&current, updated).unwrap();
    assert_eq!(next.version, current.version + 1);

    let reread = store.latest_by_name("T1").unwrap().unwrap();
    assert_eq!(reread.version, next.version);
    assert_eq!(reread.value.events.len(), 1);
}

pub(crate) fn suite_stale_update_conflicts(store: &dyn CampaignStore) {
    store.insert_record(sample_record("T1", 1, 100)).unwrap();

    let stale = store.latest_by_name("T1").unwrap().unwrap();

    // A racing writer commits first.
    let mut racing = stale.value.clone();
    racing.events.push(Event::new(EventType::Info, "racing write"));
    store.update_record(&stale, racing).unwrap();

    let mut late = stale.value.clone();
    late.events.push(Event::new(EventType::Info, "late write"));
    let err = store.update_record(&stale, late).unwrap_err();
    assert!(err.is_version_conflict());

    // The racing write survives untouched.
    let reread = store.latest_by_name("T1").unwrap().unwrap();
    assert_eq!(reread.value.events.len(), 1);
    assert_eq!(reread.value.events[0].message, "racing write");
}

pub(crate) fn suite_query_filters_and_orders_by_start_desc(store: &dyn CampaignStore) {
    store.insert_record(sample_record("T1", 3, 100)).unwrap();
    store.insert_record(sample_record("T2", 3, 300)).unwrap();
    store.insert_record(sample_record("T3", 4, 200)).unwrap();
    let mut archived = sample_record("T4", 3, 400);
    archived.archived = true;
    store.insert_record(archived).unwrap();

    let in_round = store.query_records(&RecordFilter::by_round(3)).unwrap();
    assert_eq!(
        in_round.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["T2", "T1"],
        "round filter applies, archived records hidden, newest first"
    );

    let all = store.query_records(&RecordFilter::default()).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].start >= w[1].start));

    let by_author = store
        .query_records(&RecordFilter {
            author: Some("nobody".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert!(by_author.is_empty());
}

pub(crate) fn suite_round_state_roundtrip(store: &dyn CampaignStore) {
    assert!(store.load_round_state().unwrap().is_none());

    store.save_round_state(RoundState { round: 7 }).unwrap();
    assert_eq!(store.load_round_state().unwrap(), Some(RoundState { round: 7 }));

    // unconditional overwrite, backwards included
    store.save_round_state(RoundState { round: 0 }).unwrap();
    assert_eq!(store.load_round_state().unwrap(), Some(RoundState { round: 0 }));
}
