//! Incident reporter for AWS infrastructure change events.
//!
//! On each event the reporter loads credentials from AWS Secrets Manager,
//! asks OpenAI for a remediation runbook, alerts Slack, and files an
//! incident on incident.io.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use incident_reporter::{AwsSecretsStore, Config, IncidentReporter};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let http = config.http_client()?;
//! let store = Arc::new(AwsSecretsStore::from_env().await);
//!
//! let reporter = IncidentReporter::new(config, http, store);
//! let response = reporter.handle(serde_json::json!({"detail": {}})).await;
//! println!("{} {}", response.status_code, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! See [`Config`] for the environment variables read at startup.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod event;
pub mod idempotency;
pub mod incident_io;
pub mod reporter;
pub mod runbook;
pub mod secrets;

pub use config::{Config, ConfigError};
pub use error::{ReporterError, ReporterResult};
pub use event::EventDetails;
pub use idempotency::IdempotencyStrategy;
pub use incident_io::{IncidentIoClient, IncidentPayload};
pub use reporter::{HandlerResponse, IncidentReporter};
pub use runbook::RunbookClient;
pub use secrets::{AwsSecretsStore, Secrets, SecretsStore};
