//! Field extraction from inbound infrastructure change events.
//!
//! Events arrive as loosely structured JSON (EventBridge envelopes wrapping a
//! CloudTrail record). Every field read here is optional and falls back to
//! [`UNKNOWN`] independently of the others, so extraction never fails.

use serde::Serialize;
use serde_json::Value;

/// Placeholder for any field missing from the event.
pub const UNKNOWN: &str = "Unknown";

/// The event fields that feed the runbook prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetails {
    pub instance_id: String,
    pub event_name: String,
    pub event_time: String,
    pub user_arn: String,
    pub source_ip: String,
}

impl EventDetails {
    /// Extract details from an event, defaulting each missing field.
    #[must_use]
    pub fn from_event(event: &Value) -> Self {
        let detail = event.get("detail");
        let instance_id = detail
            .and_then(|d| d.get("requestParameters"))
            .and_then(|p| p.get("instancesSet"))
            .and_then(|s| s.get("items"))
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(|item| item.get("instanceId"));

        Self {
            instance_id: text_or_unknown(instance_id),
            event_name: text_or_unknown(detail.and_then(|d| d.get("eventName"))),
            event_time: text_or_unknown(detail.and_then(|d| d.get("eventTime"))),
            user_arn: text_or_unknown(
                detail
                    .and_then(|d| d.get("userIdentity"))
                    .and_then(|u| u.get("arn")),
            ),
            source_ip: text_or_unknown(detail.and_then(|d| d.get("sourceIPAddress"))),
        }
    }
}

fn text_or_unknown(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Header line prefixed to the raw event in alerts and incident descriptions.
pub const LOG_HEADER: &str = "AWS Infra Change Detected:";

/// Build the human-readable log message: header plus the event as pretty JSON.
#[must_use]
pub fn log_message(event: &Value) -> String {
    let pretty = serde_json::to_string_pretty(event).unwrap_or_else(|_| event.to_string());
    format!("{LOG_HEADER}\n{pretty}")
}
