//! Error types for the notification system.

use thiserror::Error;

/// Errors that can occur when sending notifications.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel is not configured
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// The webhook answered with a non-success status
    #[error("{channel} webhook request failed with status code {status}")]
    Status {
        channel: &'static str,
        status: u16,
        body: String,
    },
}

impl ChannelError {
    /// Upstream HTTP status, if the webhook produced a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::NotConfigured(_) => None,
        }
    }
}
