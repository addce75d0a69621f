//! Slack webhook notification channel.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::events::NotifyEvent;
use crate::NotifyChannel;

/// Slack incoming-webhook notification channel.
///
/// The webhook URL is usually resolved at invocation time (from a secrets
/// bundle), so the channel is cheap to build per event and borrows a shared
/// `reqwest::Client`.
pub struct SlackChannel {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a Slack channel with a specific webhook URL.
    ///
    /// A blank URL leaves the channel unconfigured; sends then fail.
    #[must_use]
    pub fn new(client: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        let webhook_url = Some(webhook_url.into()).filter(|u| !u.trim().is_empty());
        if webhook_url.is_none() {
            debug!("Slack webhook URL is blank");
        }
        Self {
            webhook_url,
            client,
        }
    }

    /// Format an event as a Slack webhook payload.
    fn format_payload(event: &NotifyEvent) -> SlackPayload {
        SlackPayload { text: event.text() }
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured("Slack_Webhook_URL".to_string()))?;

        let payload = Self::format_payload(event);

        debug!(channel = self.name(), event_type = event.kind(), "Sending notification");

        let response = self.client.post(webhook_url).json(&payload).send().await?;

        if response.status().is_success() {
            debug!(channel = self.name(), "Notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = self.name(),
                status = %status,
                body = %body,
                "Slack webhook request failed"
            );

            Err(ChannelError::Status {
                channel: self.name(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct SlackPayload {
    text: String,
}
