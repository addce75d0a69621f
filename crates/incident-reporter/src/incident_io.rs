//! incident.io API client.
//!
//! Covers the three calls the reporter makes: listing severities, listing
//! incident types, and creating an incident.
//!
//! # Example
//!
//! ```no_run
//! use incident_reporter::incident_io::{IncidentIoClient, IncidentPayload};
//!
//! # async fn example() -> incident_reporter::ReporterResult<()> {
//! let client = IncidentIoClient::new(reqwest::Client::new(), "https://api.incident.io", "api-key");
//!
//! let ids = client.resolve_ids("Major").await?;
//! let payload = IncidentPayload::new(
//!     "AWS Infra Change Detected:\n{}".to_string(),
//!     ids,
//!     "1700000000000-incident".to_string(),
//!     "1. Open CloudTrail".to_string(),
//! );
//! let created = client.create_incident(&payload).await?;
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ReporterError, ReporterResult};

const SERVICE: &str = "incident.io";

/// Title of every incident filed by the reporter.
pub const INCIDENT_TITLE: &str = "AWS Infra Change Detected";

/// Incident status on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Triage,
    Investigating,
    Monitoring,
    Resolved,
}

/// Incident impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Major,
    Critical,
}

/// Incident visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// A configured severity.
#[derive(Debug, Clone, Deserialize)]
pub struct Severity {
    pub id: String,
    pub name: String,
}

/// A configured incident type.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
struct SeveritiesResponse {
    severities: Vec<Severity>,
}

#[derive(Debug, Deserialize)]
struct IncidentTypesResponse {
    incident_types: Vec<IncidentType>,
}

/// Identifiers resolved from the organisation's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIds {
    pub severity_id: String,
    pub incident_type_id: String,
}

/// Incident creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentPayload {
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    pub severity_id: String,
    pub impact: Impact,
    pub visibility: Visibility,
    pub incident_type_id: String,
    pub idempotency_key: String,
    pub runbook: String,
}

impl IncidentPayload {
    /// Assemble the payload with the fixed title, status, impact and visibility.
    #[must_use]
    pub fn new(
        description: String,
        ids: ResolvedIds,
        idempotency_key: String,
        runbook: String,
    ) -> Self {
        Self {
            title: INCIDENT_TITLE.to_string(),
            description,
            status: IncidentStatus::Triage,
            severity_id: ids.severity_id,
            impact: Impact::Major,
            visibility: Visibility::Public,
            incident_type_id: ids.incident_type_id,
            idempotency_key,
            runbook,
        }
    }
}

/// First severity whose name equals `name`.
#[must_use]
pub fn find_severity<'a>(severities: &'a [Severity], name: &str) -> Option<&'a Severity> {
    severities
        .iter()
        .find(|s| s.name == name)
        .filter(|s| !s.id.is_empty())
}

/// First incident type flagged as the default.
#[must_use]
pub fn find_default_type(types: &[IncidentType]) -> Option<&IncidentType> {
    types.iter().find(|t| t.is_default).filter(|t| !t.id.is_empty())
}

/// incident.io REST client bound to one API key.
#[derive(Debug, Clone)]
pub struct IncidentIoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IncidentIoClient {
    /// Create a client for `base_url` (e.g. `https://api.incident.io`).
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// List configured severities.
    ///
    /// # Errors
    /// Returns error if the request fails or the response is malformed.
    pub async fn list_severities(&self) -> ReporterResult<Vec<Severity>> {
        let response: SeveritiesResponse = self.get("/v1/severities").await?;
        Ok(response.severities)
    }

    /// List configured incident types.
    ///
    /// # Errors
    /// Returns error if the request fails or the response is malformed.
    pub async fn list_incident_types(&self) -> ReporterResult<Vec<IncidentType>> {
        let response: IncidentTypesResponse = self.get("/v1/incident_types").await?;
        Ok(response.incident_types)
    }

    /// Resolve the severity named `severity_name` and the default incident type.
    ///
    /// Both lists are fetched concurrently; a failure of either aborts.
    ///
    /// # Errors
    /// Propagates request failures, and returns [`ReporterError::Resolution`]
    /// if either identifier is missing.
    pub async fn resolve_ids(&self, severity_name: &str) -> ReporterResult<ResolvedIds> {
        let (severities, types) =
            tokio::try_join!(self.list_severities(), self.list_incident_types())?;

        let severity = find_severity(&severities, severity_name);
        let incident_type = find_default_type(&types);

        match (severity, incident_type) {
            (Some(severity), Some(incident_type)) => {
                info!(
                    severity_id = %severity.id,
                    incident_type_id = %incident_type.id,
                    "Resolved incident identifiers"
                );
                Ok(ResolvedIds {
                    severity_id: severity.id.clone(),
                    incident_type_id: incident_type.id.clone(),
                })
            }
            (severity, incident_type) => {
                warn!(
                    severity_name,
                    severity_found = severity.is_some(),
                    incident_type_found = incident_type.is_some(),
                    "Could not resolve incident identifiers"
                );
                Err(ReporterError::Resolution {
                    severity_found: severity.is_some(),
                    incident_type_found: incident_type.is_some(),
                })
            }
        }
    }

    /// Create an incident and return the API's response body.
    ///
    /// A success body that is not JSON is returned as a JSON string.
    ///
    /// # Errors
    /// Returns error if the request fails or the API answers non-2xx.
    pub async fn create_incident(
        &self,
        payload: &IncidentPayload,
    ) -> ReporterResult<serde_json::Value> {
        debug!(idempotency_key = %payload.idempotency_key, "Creating incident");

        let response = self
            .client
            .post(format!("{}/v1/incidents", self.base_url))
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(http_error)?;

        let body = Self::read_body(response).await?;
        // A 2xx without a JSON body is still a created incident
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ReporterResult<T> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(http_error)?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ReporterResult<T> {
        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|source| ReporterError::Decode {
            service: SERVICE,
            source,
        })
    }

    /// Read a response body, turning non-success statuses into errors.
    async fn read_body(response: reqwest::Response) -> ReporterResult<String> {
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            warn!(status = %status, path = %url, body = %body, "incident.io API request failed");
            return Err(ReporterError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn http_error(source: reqwest::Error) -> ReporterError {
    ReporterError::Http {
        service: SERVICE,
        source,
    }
}
