//! Runbook generation through the OpenAI chat-completions API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ReporterError, ReporterResult};
use crate::event::EventDetails;

const SERVICE: &str = "OpenAI";

/// System prompt framing the model as an on-call guide author.
pub const SYSTEM_PROMPT: &str = "You are an AWS DevOps expert. Provide a **step-by-step incident response guide** that an on-call engineer can follow **in the AWS Console** to investigate and remediate AWS infrastructure changes.";

/// Build the user prompt for one event.
#[must_use]
pub fn user_prompt(details: &EventDetails) -> String {
    format!(
        "An AWS infrastructure event has been detected. Below are the details:\n\
         \n\
         🔹 **Event Name:** {event_name}  \n\
         🔹 **Affected Instance ID:** {instance_id}  \n\
         🔹 **Time of Incident:** {event_time}  \n\
         🔹 **User Who Triggered Event:** {user_arn}  \n\
         🔹 **User IP Address:** {source_ip}  \n\
         \n\
         📖 **Generate a structured, actionable runbook including:**\n\
         1️⃣ **How to investigate who triggered the event using AWS CloudTrail.**  \n\
         2️⃣ **Step-by-step instructions to check IAM permissions of the user.**  \n\
         3️⃣ **Clear AWS Console steps to start the stopped instance (if applicable).**  \n\
         4️⃣ **Verification steps to ensure the instance is back to normal.**  \n\
         5️⃣ **Security best practices to prevent unauthorized changes.**",
        event_name = details.event_name,
        instance_id = details.instance_id,
        event_time = details.event_time,
        user_arn = details.user_arn,
        source_ip = details.source_ip,
    )
}

/// OpenAI API request message
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// OpenAI API response choice message
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI API response choice
#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// Chat-completions client producing runbook text.
#[derive(Debug, Clone)]
pub struct RunbookClient {
    client: Client,
    api_url: String,
    model: String,
}

impl RunbookClient {
    /// Create a client for the given endpoint and model.
    pub fn new(client: Client, api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
        }
    }

    /// Request a runbook for the event and return the first choice verbatim.
    ///
    /// # Errors
    /// Returns [`ReporterError::Upstream`] on a non-success response and
    /// [`ReporterError::EmptyCompletion`] when no choice carries content.
    pub async fn generate(&self, api_key: &str, details: &EventDetails) -> ReporterResult<String> {
        let prompt = user_prompt(details);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!(model = %self.model, event_name = %details.event_name, "Requesting runbook");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| ReporterError::Http {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ReporterError::Http {
            service: SERVICE,
            source,
        })?;

        if !status.is_success() {
            warn!(status = %status, body = %body, "OpenAI API request failed");
            return Err(ReporterError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|source| ReporterError::Decode {
                service: SERVICE,
                source,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ReporterError::EmptyCompletion(SERVICE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UNKNOWN;

    #[test]
    fn test_user_prompt_interpolates_details() {
        let details = EventDetails {
            instance_id: "i-0abc123".to_string(),
            event_name: "StopInstances".to_string(),
            event_time: "2025-02-10T12:34:56Z".to_string(),
            user_arn: "arn:aws:iam::123456789012:user/alice".to_string(),
            source_ip: "203.0.113.7".to_string(),
        };
        let prompt = user_prompt(&details);
        assert!(prompt.contains("**Event Name:** StopInstances"));
        assert!(prompt.contains("**Affected Instance ID:** i-0abc123"));
        assert!(prompt.contains("**Time of Incident:** 2025-02-10T12:34:56Z"));
        assert!(prompt.contains("**User Who Triggered Event:** arn:aws:iam::123456789012:user/alice"));
        assert!(prompt.contains("**User IP Address:** 203.0.113.7"));
        assert!(prompt.contains("Security best practices"));
    }

    #[test]
    fn test_user_prompt_keeps_markdown_line_breaks() {
        let prompt = user_prompt(&EventDetails::from_event(&serde_json::json!({})));
        let lines: Vec<&str> = prompt.split('\n').collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(
            lines[0],
            "An AWS infrastructure event has been detected. Below are the details:"
        );
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "🔹 **Event Name:** Unknown  ");
        assert_eq!(lines[6], "🔹 **User IP Address:** Unknown  ");
        assert_eq!(lines[7], "");
        assert_eq!(
            lines[8],
            "📖 **Generate a structured, actionable runbook including:**"
        );
        for line in &lines[9..13] {
            assert!(line.ends_with("**  "), "{line:?}");
        }
        assert!(lines[13].ends_with("unauthorized changes.**"));
    }

    #[test]
    fn test_user_prompt_with_placeholders() {
        let details = EventDetails::from_event(&serde_json::json!({}));
        let prompt = user_prompt(&details);
        assert_eq!(prompt.matches(UNKNOWN).count(), 5);
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "hello",
                },
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
    }
}
