use lazy_static::lazy_static;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::error;

lazy_static! {
    pub static ref REGISTERED_TESTS_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new("registered_tests", "Tests registered, labelled by selector strategy"),
        &["strategy"]
    )
    .expect("metric can not be created");

    pub static ref VERSION_CONFLICT_RETRIES_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "version_conflict_retries",
            "Optimistic-concurrency retries, labelled by operation"
        ),
        &["op"]
    )
    .expect("metric can not be created");

    pub static ref REPORTED_EVENTS_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new("reported_events", "Events appended to test records"),
        &["event_type"]
    )
    .expect("metric can not be created");

    pub static ref NOTIFICATIONS_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new("notifications", "Summary pushes, labelled by outcome"),
        &["outcome"]
    )
    .expect("metric can not be created");
}

pub fn register_custom_metrics(registry: &Registry) {
    if let Err(e) = registry.register(Box::new(REGISTERED_TESTS_METRIC.clone())) {
        error!("registered_tests can not be registered: {}", e);
    }
    if let Err(e) = registry.register(Box::new(VERSION_CONFLICT_RETRIES_METRIC.clone())) {
        error!("version_conflict_retries can not be registered: {}", e);
    }
    if let Err(e) = registry.register(Box::new(REPORTED_EVENTS_METRIC.clone())) {
        error!("reported_events can not be registered: {}", e);
    }
    if let Err(e) = registry.register(Box::new(NOTIFICATIONS_METRIC.clone())) {
        error!("notifications can not be registered: {}", e);
    }
}
