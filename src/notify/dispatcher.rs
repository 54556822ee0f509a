use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono::Timelike;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::CampaignStatus;
use super::Clock;
use super::MessageField;
use super::NotificationMessage;
use super::NotificationSink;
use crate::metrics::NOTIFICATIONS_METRIC;
use crate::Aggregator;
use crate::DispatcherConfig;
use crate::Result;
use crate::RoundCounter;
use crate::RoundResults;

/// Periodic job pushing a throttled per-round summary to the external channel.
///
/// Each tick: read the current round, snapshot it through the aggregator,
/// derive an overall status, and push at most one summary per local calendar
/// day once the configured hour has passed. The "last sent day" is explicit
/// per-instance state carried across iterations; it is not fenced against a
/// forced tick racing the loop (accepted).
pub struct NotificationDispatcher {
    rounds: RoundCounter,
    aggregator: Aggregator,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    config: DispatcherConfig,
    last_sent_day: Option<NaiveDate>,
}

impl NotificationDispatcher {
    pub fn new(
        rounds: RoundCounter,
        aggregator: Aggregator,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            rounds,
            aggregator,
            sink,
            clock,
            config,
            last_sent_day: None,
        }
    }

    /// Loop for the process lifetime; returns only on cancellation.
    pub async fn run(
        mut self,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.interval_in_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!("[NotificationDispatcher] cancellation signal received.");
                    return Ok(());
                }

                _ = interval.tick() => {
                    self.tick(false);
                }
            }
        }
    }

    /// One dispatch iteration. `forced` bypasses the send window but still
    /// records the send day on success.
    pub fn tick(
        &mut self,
        forced: bool,
    ) {
        let round = match self.rounds.get() {
            Ok(round) => round,
            Err(e) => {
                warn!("dispatcher: reading round failed: {}", e);
                return;
            }
        };
        let results = match self.aggregator.get_round_results(round) {
            Ok(results) => results,
            Err(e) => {
                warn!("dispatcher: round {} snapshot failed: {}", round, e);
                return;
            }
        };

        let now = self.clock.now_local();
        let today = now.date_naive();
        let window_open =
            now.hour() >= self.config.send_after_hour && self.last_sent_day != Some(today);
        if !forced && !window_open {
            debug!("dispatcher: outside send window, skipping round {} summary", round);
            NOTIFICATIONS_METRIC.with_label_values(&["skipped"]).inc();
            return;
        }

        let message = build_summary_message(&self.config.channel, &results);
        match self.sink.send(&message) {
            Ok(()) => {
                info!("dispatcher: round {} summary pushed to {}", round, message.channel);
                NOTIFICATIONS_METRIC.with_label_values(&["sent"]).inc();
                self.last_sent_day = Some(today);
            }
            Err(e) => {
                // best-effort channel: never escalate
                warn!("dispatcher: summary push failed: {}", e);
                NOTIFICATIONS_METRIC.with_label_values(&["failed"]).inc();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn last_sent_day(&self) -> Option<NaiveDate> {
        self.last_sent_day
    }
}

/// Any failure wins over everything; an idle round is suspicious on its own.
pub(crate) fn derive_status(results: &RoundResults) -> CampaignStatus {
    if results.total_failures > 0 {
        CampaignStatus::Degraded
    } else if results.total_tests_in_round == 0 {
        CampaignStatus::Warning
    } else {
        CampaignStatus::Healthy
    }
}

pub(crate) fn build_summary_message(
    channel: &str,
    results: &RoundResults,
) -> NotificationMessage {
    let status = derive_status(results);

    let mut fields = vec![
        MessageField {
            title: "Total tests".to_string(),
            value: results.total_tests_in_round.to_string(),
            is_short: true,
        },
        MessageField {
            title: "Unique failures".to_string(),
            value: results.unique_fail_count.to_string(),
            is_short: true,
        },
        MessageField {
            title: "Still running".to_string(),
            value: results.total_still_running.to_string(),
            is_short: true,
        },
    ];

    let failed_counts = per_name_counts(results.failing.iter().map(|r| r.name.as_str()));
    if !failed_counts.is_empty() {
        fields.push(MessageField {
            title: "Failed".to_string(),
            value: format_counts(&failed_counts),
            is_short: false,
        });
    }

    let running_counts = per_name_counts(results.still_running.iter().map(|r| r.name.as_str()));
    if !running_counts.is_empty() {
        fields.push(MessageField {
            title: "Not finished".to_string(),
            value: format_counts(&running_counts),
            is_short: false,
        });
    }

    NotificationMessage {
        channel: channel.to_string(),
        title: format!("Test campaign round {}: {:?}", results.round, status),
        color: status.color().to_string(),
        fields,
    }
}

fn per_name_counts<'a>(names: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

fn format_counts(counts: &BTreeMap<&str, usize>) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{name} x{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join mechanism for the owning process: cancel, then wait out the grace
/// period for the loop to stop.
pub struct DispatcherHandle {
    cancel: CancellationToken,
    handle: JoinHandle<Result<()>>,
    grace: Duration,
}

impl DispatcherHandle {
    pub(crate) fn new(
        cancel: CancellationToken,
        handle: JoinHandle<Result<()>>,
        grace: Duration,
    ) -> Self {
        Self {
            cancel,
            handle,
            grace,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Signals cancellation and waits for the loop, bounded by the shutdown
    /// grace period.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        match tokio::time::timeout(self.grace, self.handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                warn!("dispatcher task join failed: {}", join_error);
                Ok(())
            }
            Err(_) => {
                warn!("dispatcher did not stop within {:?}", self.grace);
                Ok(())
            }
        }
    }
}
