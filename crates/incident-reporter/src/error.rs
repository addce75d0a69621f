//! Error types for the incident reporting pipeline.

use thiserror::Error;

/// Fallback status when a failure did not come from a downstream response.
pub const FALLBACK_STATUS: u16 = 500;

/// Errors raised by any step of the pipeline.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The secrets store could not be reached or rejected the lookup
    #[error("Failed to retrieve secret '{secret_id}': {message}")]
    Secrets { secret_id: String, message: String },

    /// The secret exists but does not hold the expected credential bundle
    #[error("Secret '{secret_id}' is malformed: {message}")]
    SecretFormat { secret_id: String, message: String },

    /// A downstream API answered with a non-success status
    #[error("{service} request failed with status code {status}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Transport failure before a response was received
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Chat notification failed
    #[error(transparent)]
    Notify(#[from] notify::ChannelError),

    /// The language model returned no usable completion
    #[error("{0} returned no completion choices")]
    EmptyCompletion(&'static str),

    /// Severity or incident type could not be resolved
    #[error("Failed to fetch severity_id or incident_type_id from Incident.io")]
    Resolution {
        severity_found: bool,
        incident_type_found: bool,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ReporterError {
    /// HTTP-like status for the invocation result.
    ///
    /// Errors caused by a downstream response reflect that response's status;
    /// everything else maps to [`FALLBACK_STATUS`].
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::Http { source, .. } => source
                .status()
                .map_or(FALLBACK_STATUS, |s| s.as_u16()),
            Self::Notify(e) => e.status().unwrap_or(FALLBACK_STATUS),
            _ => FALLBACK_STATUS,
        }
    }

    /// Raw body returned by the downstream service, when there was one.
    #[must_use]
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            Self::Upstream { body, .. }
            | Self::Notify(notify::ChannelError::Status { body, .. }) => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type ReporterResult<T> = Result<T, ReporterError>;
