use std::time::Duration;

use super::retry::retry_on_conflict;
use crate::Error;
use crate::Result;
use crate::StorageError;

fn conflict() -> Error {
    StorageError::VersionConflict {
        id: "r-1".to_string(),
        expected: 1,
    }
    .into()
}

#[test]
fn should_return_first_success() {
    let result = retry_on_conflict("test_op", Duration::from_secs(30), || Ok(42));
    assert_eq!(result.unwrap(), 42);
}

#[test]
fn should_retry_conflicts_until_success() {
    let mut attempts = 0;
    let result = retry_on_conflict("test_op", Duration::from_secs(30), || {
        attempts += 1;
        if attempts < 3 {
            Err(conflict())
        } else {
            Ok(attempts)
        }
    });
    assert_eq!(result.unwrap(), 3);
}

#[test]
fn should_escalate_to_fatal_once_budget_is_exhausted() {
    let result: Result<()> = retry_on_conflict("test_op", Duration::from_millis(0), || Err(conflict()));
    assert!(matches!(result.unwrap_err(), Error::Fatal(_)));
}

#[test]
fn should_not_retry_non_conflict_errors() {
    let mut attempts = 0;
    let result: Result<()> = retry_on_conflict("test_op", Duration::from_secs(30), || {
        attempts += 1;
        Err(Error::Fatal("storage down".to_string()))
    });
    assert!(matches!(result.unwrap_err(), Error::Fatal(_)));
    assert_eq!(attempts, 1);
}
