use std::collections::HashSet;

use crate::TestRecord;

/// Per-round health summary produced by the aggregation queries.
///
/// Records are partitioned into disjoint buckets: still-running ones first
/// (`finished == false`), then failing ones among the finished set.
#[derive(Debug, Clone, Default)]
pub struct RoundResults {
    pub round: i64,
    pub total_tests_in_round: usize,
    /// Failing finished records
    pub total_failures: usize,
    /// Distinct failing test names
    pub unique_fail_count: usize,
    pub total_still_running: usize,
    pub failing: Vec<TestRecord>,
    pub still_running: Vec<TestRecord>,
}

impl RoundResults {
    pub(crate) fn from_records(
        round: i64,
        records: Vec<TestRecord>,
    ) -> Self {
        let total_tests_in_round = records.len();
        let mut failing = Vec::new();
        let mut still_running = Vec::new();

        for record in records {
            if !record.finished {
                still_running.push(record);
            } else if record.is_failing() {
                failing.push(record);
            }
        }

        let unique_fail_count = failing
            .iter()
            .map(|r| r.name.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            round,
            total_tests_in_round,
            total_failures: failing.len(),
            unique_fail_count,
            total_still_running: still_running.len(),
            failing,
            still_running,
        }
    }
}
