//! Notification channel contract and the periodic summary dispatcher.

mod dispatcher;

pub use dispatcher::*;


use chrono::DateTime;
use chrono::Local;

use crate::Result;

#[cfg(test)]
use mockall::automock;

/// Overall campaign health derived from one round snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    Healthy,
    /// No tests ran in the round at all
    Warning,
    Degraded,
}

impl CampaignStatus {
    pub fn color(&self) -> &'static str {
        match self {
            CampaignStatus::Healthy => "good",
            CampaignStatus::Warning => "warning",
            CampaignStatus::Degraded => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageField {
    pub title: String,
    pub value: String,
    pub is_short: bool,
}

/// Structured payload pushed to the external channel. The wire transport
/// behind the sink is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub channel: String,
    pub title: String,
    pub color: String,
    pub fields: Vec<MessageField>,
}

/// Best-effort delivery: the dispatcher logs and swallows sink failures, so a
/// missed summary push never fails the coordinator.
#[cfg_attr(test, automock)]
pub trait NotificationSink: Send + Sync + 'static {
    fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<()>;
}

/// Reference sink: logs the payload instead of pushing it anywhere.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<()> {
        tracing::info!(
            "notification to {}: {} [{}] ({} fields)",
            message.channel,
            message.title,
            message.color,
            message.fields.len()
        );
        Ok(())
    }
}

/// Local wall-clock source, injectable so the dispatcher's send window is
/// testable with fake clocks.
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync + 'static {
    fn now_local(&self) -> DateTime<Local>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}
