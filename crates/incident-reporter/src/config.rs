//! Configuration for the incident reporter.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::idempotency::IdempotencyStrategy;

/// Default secrets store identifier holding the credential bundle.
pub const DEFAULT_SECRET_ID: &str = "poc";

/// Default chat-completions endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default completion model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

/// Default incident.io API root.
pub const DEFAULT_INCIDENT_IO_BASE_URL: &str = "https://api.incident.io";

/// Default severity name the incident is filed under.
pub const DEFAULT_SEVERITY_NAME: &str = "Major";

/// Incident reporter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secrets store key for the credential bundle.
    pub secret_id: String,
    /// Chat-completions endpoint (overridable for proxies).
    pub openai_api_url: String,
    /// Model used to generate the runbook.
    pub openai_model: String,
    /// incident.io API root, without a trailing slash.
    pub incident_io_base_url: String,
    /// Severity name resolved to `severity_id`.
    pub severity_name: String,
    /// How the incident idempotency key is derived.
    pub idempotency: IdempotencyStrategy,
    /// Per-request timeout for outbound HTTP calls. `None` leaves the
    /// platform invocation timeout as the only limit.
    pub http_timeout: Option<Duration>,
}

/// Configuration values that cannot be interpreted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {var} '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// built-in defaults for unset values.
    ///
    /// # Errors
    /// Returns error if `IDEMPOTENCY_STRATEGY` or `HTTP_TIMEOUT_SECS` is set
    /// to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::defaults();

        let idempotency = match lookup("IDEMPOTENCY_STRATEGY") {
            Some(value) => {
                IdempotencyStrategy::from_str(&value).map_err(|reason| ConfigError::Invalid {
                    var: "IDEMPOTENCY_STRATEGY",
                    value,
                    reason,
                })?
            }
            None => defaults.idempotency,
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::Invalid {
                        var: "HTTP_TIMEOUT_SECS",
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
                // 0 disables the client timeout
                Some(secs).filter(|s| *s > 0).map(Duration::from_secs)
            }
            None => defaults.http_timeout,
        };

        Ok(Self {
            secret_id: lookup("SECRET_ID")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.secret_id),
            openai_api_url: lookup("OPENAI_API_URL").unwrap_or(defaults.openai_api_url),
            openai_model: lookup("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            incident_io_base_url: lookup("INCIDENT_IO_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.incident_io_base_url),
            severity_name: lookup("INCIDENT_SEVERITY_NAME").unwrap_or(defaults.severity_name),
            idempotency,
            http_timeout,
        })
    }

    /// Configuration with built-in defaults only, ignoring the environment.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            secret_id: DEFAULT_SECRET_ID.to_string(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            incident_io_base_url: DEFAULT_INCIDENT_IO_BASE_URL.to_string(),
            severity_name: DEFAULT_SEVERITY_NAME.to_string(),
            idempotency: IdempotencyStrategy::default(),
            http_timeout: None,
        }
    }

    /// Build the shared HTTP client honouring the configured timeout.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
