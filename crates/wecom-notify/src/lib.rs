//! Alert notification delivery to WeCom (WeChat Work) group robots.
//!
//! An [`EvaluationContext`] is rendered into a `text` robot message with
//! optional mentions. When the notifier wants an image and the host could
//! not publish one, the locally rendered image is pushed as a second `image`
//! message. Channels are created through the [`plugin::ChannelRegistry`] and
//! deliver through a [`transport::WebhookTransport`].

pub mod channels;
pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod plugin;
pub mod transport;
pub mod utils;


use async_trait::async_trait;
use error::Result;
use wecom_common::types::EvaluationContext;

/// A notification delivery channel that sends evaluation results to an
/// external service.
///
/// Implementations are created by the corresponding [`plugin::ChannelPlugin`].
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers the evaluation result through this channel.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered. Nothing is retried.
    async fn send(&self, ctx: &EvaluationContext) -> Result<()>;

    /// Returns the channel type name (e.g., `"wecom robot"`).
    fn channel_type(&self) -> &str;

    fn instance_id(&self) -> &str;
}
