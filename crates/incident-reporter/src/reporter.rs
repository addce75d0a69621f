//! The incident reporting pipeline.
//!
//! One invocation runs these steps in order, stopping at the first failure:
//!
//! 1. Load the credential bundle from the secrets store
//! 2. Extract event details and generate a runbook
//! 3. Post the alert and runbook to Slack
//! 4. Resolve severity and incident type identifiers
//! 5. Create the incident
//!
//! Nothing is retried or rolled back. If incident creation fails after the
//! Slack alert went out, the alert stays posted.

use std::sync::Arc;

use chrono::Utc;
use notify::{NotifyChannel, NotifyEvent, SlackChannel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{ReporterError, ReporterResult};
use crate::event::{log_message, EventDetails};
use crate::incident_io::{IncidentIoClient, IncidentPayload};
use crate::runbook::RunbookClient;
use crate::secrets::{Secrets, SecretsStore};

/// Invocation result in the shape the function runtime returns to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    /// Success response carrying the created incident.
    #[must_use]
    pub fn created(incident: &Value) -> Self {
        Self {
            status_code: 200,
            body: incident.to_string(),
        }
    }

    /// Failure response: upstream or fallback status, message as a JSON string.
    #[must_use]
    pub fn from_error(err: &ReporterError) -> Self {
        Self {
            status_code: err.status_code(),
            body: Value::String(err.to_string()).to_string(),
        }
    }
}

/// Runs the reporting pipeline for inbound infrastructure change events.
#[derive(Clone)]
pub struct IncidentReporter {
    config: Config,
    http: reqwest::Client,
    secrets: Arc<dyn SecretsStore>,
}

impl IncidentReporter {
    /// Create a reporter with injected configuration, HTTP client and store.
    pub fn new(config: Config, http: reqwest::Client, secrets: Arc<dyn SecretsStore>) -> Self {
        Self {
            config,
            http,
            secrets,
        }
    }

    /// Handle one event, mapping any failure to a response.
    pub async fn handle(&self, event: Value) -> HandlerResponse {
        match self.report(&event).await {
            Ok(incident) => {
                info!(incident = %incident, "Incident created successfully");
                HandlerResponse::created(&incident)
            }
            Err(e) => {
                error!(
                    error = %e,
                    status = e.status_code(),
                    upstream_body = e.upstream_body().unwrap_or_default(),
                    "Error creating incident"
                );
                HandlerResponse::from_error(&e)
            }
        }
    }

    /// Run the pipeline and return the incident API's response body.
    ///
    /// # Errors
    /// Returns the first error raised by any step.
    pub async fn report(&self, event: &Value) -> ReporterResult<Value> {
        info!(secret_id = %self.config.secret_id, "Incident reporter invoked");

        let secrets = Secrets::fetch(self.secrets.as_ref(), &self.config.secret_id).await?;
        let log_message = log_message(event);
        let details = EventDetails::from_event(event);

        info!(
            event_name = %details.event_name,
            instance_id = %details.instance_id,
            "Generating runbook"
        );
        let runbook = RunbookClient::new(
            self.http.clone(),
            &self.config.openai_api_url,
            &self.config.openai_model,
        )
        .generate(&secrets.openai_api_key, &details)
        .await?;

        let channel = SlackChannel::new(self.http.clone(), &secrets.slack_webhook_url);
        info!(channel = channel.name(), "Sending alert");
        channel
            .send(&NotifyEvent::InfraChange {
                log_message: log_message.clone(),
                runbook: runbook.clone(),
            })
            .await?;

        info!("Resolving severity and incident type");
        let incidents = IncidentIoClient::new(
            self.http.clone(),
            &self.config.incident_io_base_url,
            &secrets.incident_io_api_key,
        );
        let ids = incidents.resolve_ids(&self.config.severity_name).await?;

        let idempotency_key = self.config.idempotency.key(event, Utc::now());
        info!(
            idempotency_key = %idempotency_key,
            strategy = %self.config.idempotency,
            "Reporting incident"
        );
        let payload = IncidentPayload::new(log_message, ids, idempotency_key, runbook);
        incidents.create_incident(&payload).await
    }
}
