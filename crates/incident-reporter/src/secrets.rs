//! Credential bundle retrieval from a secrets store.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ReporterError, ReporterResult};

/// A store that resolves a secret identifier to its string value.
#[async_trait]
pub trait SecretsStore: Send + Sync {
    /// Fetch the raw secret string for `secret_id`.
    async fn get_secret_string(&self, secret_id: &str) -> ReporterResult<String>;
}

/// AWS Secrets Manager backed store.
#[derive(Debug, Clone)]
pub struct AwsSecretsStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretsStore {
    /// Wrap an existing Secrets Manager client.
    #[must_use]
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS configuration chain.
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(aws_sdk_secretsmanager::Client::new(&config))
    }
}

#[async_trait]
impl SecretsStore for AwsSecretsStore {
    async fn get_secret_string(&self, secret_id: &str) -> ReporterResult<String> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| ReporterError::Secrets {
                secret_id: secret_id.to_string(),
                message: aws_sdk_secretsmanager::error::DisplayErrorContext(&e).to_string(),
            })?;

        response
            .secret_string()
            .map(ToString::to_string)
            .ok_or_else(|| ReporterError::SecretFormat {
                secret_id: secret_id.to_string(),
                message: "secret has no SecretString".to_string(),
            })
    }
}

/// The three credentials used by one invocation.
#[derive(Clone, Deserialize)]
pub struct Secrets {
    #[serde(rename = "ChatGPT_API_Key")]
    pub openai_api_key: String,
    #[serde(rename = "Slack_Webhook_URL")]
    pub slack_webhook_url: String,
    #[serde(rename = "INCIDENT_IO_API_KEY")]
    pub incident_io_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &"<redacted>")
            .field("slack_webhook_url", &"<redacted>")
            .field("incident_io_api_key", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// Fetch and parse the credential bundle stored under `secret_id`.
    ///
    /// # Errors
    /// Propagates store failures; returns [`ReporterError::SecretFormat`] if
    /// the secret is not a JSON object with all three keys.
    pub async fn fetch(store: &dyn SecretsStore, secret_id: &str) -> ReporterResult<Self> {
        let raw = store.get_secret_string(secret_id).await?;
        let secrets = Self::parse(secret_id, &raw)?;
        debug!(secret_id, "Credential bundle loaded");
        Ok(secrets)
    }

    fn parse(secret_id: &str, raw: &str) -> ReporterResult<Self> {
        serde_json::from_str(raw).map_err(|e| ReporterError::SecretFormat {
            secret_id: secret_id.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bundle() {
        let secrets = Secrets::parse(
            "poc",
            r#"{"ChatGPT_API_Key":"sk-1","Slack_Webhook_URL":"https://hooks","INCIDENT_IO_API_KEY":"inc-1","Extra":"x"}"#,
        )
        .unwrap();
        assert_eq!(secrets.openai_api_key, "sk-1");
        assert_eq!(secrets.slack_webhook_url, "https://hooks");
        assert_eq!(secrets.incident_io_api_key, "inc-1");
    }

    #[test]
    fn test_missing_key_is_format_error() {
        let err = Secrets::parse("poc", r#"{"ChatGPT_API_Key":"sk-1"}"#).unwrap_err();
        assert!(matches!(err, ReporterError::SecretFormat { .. }));
    }

    #[test]
    fn test_debug_redacts_values() {
        let secrets = Secrets::parse(
            "poc",
            r#"{"ChatGPT_API_Key":"sk-secret","Slack_Webhook_URL":"u","INCIDENT_IO_API_KEY":"k"}"#,
        )
        .unwrap();
        assert!(!format!("{secrets:?}").contains("sk-secret"));
    }
}
