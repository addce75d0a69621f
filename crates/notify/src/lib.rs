//! Chat notifications for infrastructure change alerts.
//!
//! This crate posts alert messages to chat webhooks. Unlike a
//! fire-and-forget notifier, every send is awaited and its failure is
//! returned to the caller, so a pipeline can stop at the first failed step.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{NotifyChannel, NotifyEvent, SlackChannel};
//!
//! # async fn example() -> Result<(), notify::ChannelError> {
//! let channel = SlackChannel::new(reqwest::Client::new(), "https://hooks.slack.com/services/T/B/X");
//!
//! channel
//!     .send(&NotifyEvent::InfraChange {
//!         log_message: "AWS Infra Change Detected:\n{}".to_string(),
//!         runbook: "1. Open CloudTrail".to_string(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for notification channels
//! - [`SlackChannel`] implements Slack incoming-webhook notifications

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod events;

pub use channels::slack::SlackChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use events::NotifyEvent;
