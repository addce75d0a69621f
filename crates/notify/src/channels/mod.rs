//! Notification channel implementations.

pub mod slack;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::events::NotifyEvent;

/// A chat destination that alerts can be delivered to.
///
/// Delivery is awaited: a failed send is returned to the caller rather than
/// logged and dropped.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Channel name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Deliver one event.
    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError>;
}
