//! Best-effort activity logging.
//!
//! Mutations record an event through [`ActivityLog`]; a failing sink is
//! logged and swallowed so it can never fail the primary operation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{EstateId, UserId};

/// One recorded action against an estate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub actor: UserId,
    pub estate: EstateId,
    pub action: String,
    pub subject: String,
    pub at: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn now(actor: UserId, estate: EstateId, action: &str, subject: impl Into<String>) -> Self {
        Self {
            actor,
            estate,
            action: action.to_string(),
            subject: subject.into(),
            at: Utc::now(),
        }
    }
}

/// Outbound sink for activity events.
pub trait ActivitySink: Send + Sync {
    fn record(&self, event: ActivityEvent) -> Result<(), ActivityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("activity sink unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget wrapper around an [`ActivitySink`].
#[derive(Clone)]
pub struct ActivityLog {
    sink: Arc<dyn ActivitySink>,
}

impl ActivityLog {
    pub fn new(sink: Arc<dyn ActivitySink>) -> Self {
        Self { sink }
    }

    /// Record an event, discarding sink failures.
    pub fn record(&self, actor: UserId, estate: EstateId, action: &str, subject: impl Into<String>) {
        let event = ActivityEvent::now(actor, estate, action, subject);
        if let Err(err) = self.sink.record(event) {
            warn!(%err, %action, "activity log write failed");
        }
    }
}
