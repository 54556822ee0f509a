//! Core campaign entities: environment assignments, test records and their
//! event history, plus the process-wide round singleton.

use std::collections::BTreeMap;

use nanoid::nanoid;
use serde::Deserialize;
use serde::Serialize;

use crate::utils::time::get_now_as_u64;

/// Snapshot describing which cluster/database one test run targets.
///
/// Immutable once issued; a fresh value is produced per registration by the
/// active selector strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Ordered endpoints of the assigned cluster
    pub cluster_urls: Vec<String>,
    pub database_name: String,
    /// Tag of the selector strategy that produced this assignment
    pub strategy_name: String,
    pub client_credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Info,
    TestSuccess,
    TestFailure,
}

/// One structured report emitted by a running test client. Immutable once
/// appended to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub message: String,
    pub additional_info: BTreeMap<String, String>,
    pub exception: Option<String>,
    pub event_type: EventType,
    /// Epoch millis at the emitting client. Events within one record are
    /// ordered by commit order at the store, not by this timestamp.
    pub timestamp: u64,
}

impl Event {
    pub fn new(
        event_type: EventType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            additional_info: BTreeMap::new(),
            exception: None,
            event_type,
            timestamp: get_now_as_u64(),
        }
    }

    pub fn with_info(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    pub fn with_exception(
        mut self,
        exception: impl Into<String>,
    ) -> Self {
        self.exception = Some(exception.into());
        self
    }
}

/// Registration parameters supplied by a test client.
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub name: String,
    pub class_name: String,
    pub author: String,
    /// Campaign generation; the sentinel -1 is carried literally when the
    /// client could not resolve its round
    pub round: i64,
    pub correlation_token: Option<String>,
}

/// The persisted row describing one test run's lifecycle and emitted events.
///
/// Created at register time, mutated by report/unregister, never deleted:
/// `archived` marks logical removal while keeping the history append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub correlation_token: Option<String>,
    pub name: String,
    pub extended_name: String,
    pub class_name: String,
    pub author: String,
    /// Epoch millis; "latest record by name" means greatest `start`
    pub start: u64,
    pub end: Option<u64>,
    pub finished: bool,
    pub round: i64,
    pub config: EnvironmentConfig,
    /// Append-only; entries are never reordered or removed
    pub events: Vec<Event>,
    pub archived: bool,
}

impl TestRecord {
    pub(crate) fn started_now(
        request: &RegisterRequest,
        config: EnvironmentConfig,
    ) -> Self {
        let extended_name = format!("{}@{}", request.name, config.database_name);
        Self {
            id: nanoid!(),
            correlation_token: request.correlation_token.clone(),
            name: request.name.clone(),
            extended_name,
            class_name: request.class_name.clone(),
            author: request.author.clone(),
            start: get_now_as_u64(),
            end: None,
            finished: false,
            round: request.round,
            config,
            events: Vec::new(),
            archived: false,
        }
    }

    /// Failure rule shared by the aggregation queries: a record fails when it
    /// never reported a success, or reported at least one failure.
    pub fn is_failing(&self) -> bool {
        let has_success = self
            .events
            .iter()
            .any(|e| e.event_type == EventType::TestSuccess);
        let has_failure = self
            .events
            .iter()
            .any(|e| e.event_type == EventType::TestFailure);
        !has_success || has_failure
    }
}

/// Singleton identifying the current campaign generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub round: i64,
}
