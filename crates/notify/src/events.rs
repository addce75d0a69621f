//! Notification event types for infrastructure change alerts.

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum NotifyEvent {
    /// An infrastructure change was detected and a runbook generated for it
    InfraChange {
        /// Summary header followed by the raw event as pretty JSON
        log_message: String,
        /// Generated remediation guide
        runbook: String,
    },
}

impl NotifyEvent {
    /// Stable identifier for this event type, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InfraChange { .. } => "infra_change",
        }
    }

    /// Get a short title for this event type.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InfraChange { .. } => "Incident Alert!",
        }
    }

    /// Render the plain-text message body posted to chat webhooks.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::InfraChange {
                log_message,
                runbook,
            } => format!(
                "🚨 *{}* 🚨\n{log_message}\n📖 Runbook: {runbook}",
                self.title()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infra_change_text() {
        let event = NotifyEvent::InfraChange {
            log_message: "AWS Infra Change Detected:\n{}".to_string(),
            runbook: "1. Open CloudTrail".to_string(),
        };
        assert_eq!(
            event.text(),
            "🚨 *Incident Alert!* 🚨\nAWS Infra Change Detected:\n{}\n📖 Runbook: 1. Open CloudTrail"
        );
    }

    #[test]
    fn test_kind_is_distinct_from_title() {
        let event = NotifyEvent::InfraChange {
            log_message: String::new(),
            runbook: String::new(),
        };
        assert_eq!(event.kind(), "infra_change");
        assert_eq!(event.title(), "Incident Alert!");
    }
}
