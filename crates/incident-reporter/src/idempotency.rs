//! Idempotency key generation for incident creation.
//!
//! The incident API deduplicates submissions that share a key. Which key is
//! sent is a deployment decision:
//!
//! - [`IdempotencyStrategy::Timestamp`] derives the key from the invocation
//!   time in milliseconds. Two invocations in the same millisecond collide,
//!   and a redelivered event gets a fresh key, so duplicates are possible.
//! - [`IdempotencyStrategy::EventId`] derives the key from the event
//!   envelope's `id`, so redeliveries of the same event map to one incident.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Suffix appended to every generated key.
pub const KEY_SUFFIX: &str = "-incident";

/// How the incident idempotency key is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdempotencyStrategy {
    /// `"{unix_millis}-incident"`
    #[default]
    Timestamp,
    /// `"{event.id}-incident"`, falling back to the timestamp key
    EventId,
}

impl IdempotencyStrategy {
    /// Generate the key for one invocation.
    #[must_use]
    pub fn key(self, event: &Value, now: DateTime<Utc>) -> String {
        match self {
            Self::Timestamp => timestamp_key(now),
            Self::EventId => event
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map_or_else(|| timestamp_key(now), |id| format!("{id}{KEY_SUFFIX}")),
        }
    }
}

fn timestamp_key(now: DateTime<Utc>) -> String {
    format!("{}{KEY_SUFFIX}", now.timestamp_millis())
}

impl FromStr for IdempotencyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "event-id" | "event_id" => Ok(Self::EventId),
            other => Err(format!("unknown idempotency strategy '{other}'")),
        }
    }
}

impl fmt::Display for IdempotencyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => f.write_str("timestamp"),
            Self::EventId => f.write_str("event-id"),
        }
    }
}
