use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::warn;

use crate::metrics::VERSION_CONFLICT_RETRIES_METRIC;
use crate::Error;
use crate::Result;

/// Read-transform-commit loop bounded by a wall-clock budget.
///
/// `apply` must perform the full sequence itself (fresh read included) so a
/// retry observes the racing writer's committed value. Version conflicts are
/// retried immediately; once the cumulative elapsed time exceeds `budget` the
/// conflict escalates to `Error::Fatal`. Every other error is returned as is.
pub(crate) fn retry_on_conflict<T, F>(
    op: &str,
    budget: Duration,
    mut apply: F,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let started = Instant::now();
    loop {
        match apply() {
            Err(e) if e.is_version_conflict() => {
                VERSION_CONFLICT_RETRIES_METRIC.with_label_values(&[op]).inc();
                if started.elapsed() >= budget {
                    warn!("{}: conflict retry budget of {:?} exhausted", op, budget);
                    return Err(Error::retry_budget_exhausted(op, budget));
                }
                debug!("{}: version conflict, retrying from a fresh read", op);
            }
            other => return other,
        }
    }
}
