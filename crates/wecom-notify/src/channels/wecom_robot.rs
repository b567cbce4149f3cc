use crate::config::{NotificationConfig, WeComRobotSettings};
use crate::error::{NotifyError, Result};
use crate::format::format_content;
use crate::message::RobotMessage;
use crate::plugin::{ChannelPlugin, SettingOption};
use crate::transport::WebhookTransport;
use crate::utils::redact_webhook_key;
use crate::NotificationChannel;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use wecom_common::types::EvaluationContext;

pub struct WeComRobotChannel {
    instance_id: String,
    config: NotificationConfig,
    transport: Arc<dyn WebhookTransport>,
}

impl WeComRobotChannel {
    pub fn new(
        instance_id: &str,
        config: NotificationConfig,
        transport: Arc<dyn WebhookTransport>,
    ) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            config,
            transport,
        }
    }

    async fn deliver(&self, message: &RobotMessage) -> Result<()> {
        let body = message.to_json().map_err(|e| {
            tracing::error!(
                instance_id = %self.instance_id,
                kind = message.kind(),
                error = %e,
                "Failed to marshal WeCom robot payload"
            );
            NotifyError::Serialization(e)
        })?;

        self.transport
            .send_sync(self.config.webhook(), &body)
            .await
            .map_err(|e| {
                tracing::error!(
                    instance_id = %self.instance_id,
                    kind = message.kind(),
                    error = %e,
                    "Failed to send WeCom robot message"
                );
                NotifyError::Delivery {
                    message: message.kind(),
                    source: e,
                }
            })
    }

    /// Pushes the locally rendered image when no public URL is available.
    /// A missing file is not an error.
    async fn send_local_image(&self, ctx: &EvaluationContext) -> Result<()> {
        let Some(path) = ctx.image_on_disk_path.as_deref() else {
            return Ok(());
        };
        if tokio::fs::metadata(path).await.is_err() {
            tracing::debug!(
                instance_id = %self.instance_id,
                path = %path.display(),
                "No rendered image on disk, skipping image message"
            );
            return Ok(());
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| NotifyError::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;

        self.deliver(&RobotMessage::image(&bytes)).await
    }
}

#[async_trait]
impl NotificationChannel for WeComRobotChannel {
    async fn send(&self, ctx: &EvaluationContext) -> Result<()> {
        tracing::info!(
            instance_id = %self.instance_id,
            rule = %ctx.rule_name,
            state = %ctx.state,
            "Sending WeCom group robot message"
        );

        let formatted = format_content(ctx, &self.config);
        let text = RobotMessage::text(
            formatted.content,
            formatted.mentioned_list,
            formatted.mentioned_mobile_list,
        );

        let text_result = match self.deliver(&text).await {
            Err(e @ NotifyError::Serialization(_)) => return Err(e),
            other => other,
        };

        if !ctx.requires_image || ctx.public_image_url().is_some() {
            return text_result;
        }

        // A failed text delivery does not stop the image attempt, but it is
        // still the error reported to the caller.
        let image_result = self.send_local_image(ctx).await;
        text_result.and(image_result)
    }

    fn channel_type(&self) -> &str {
        WeComRobotPlugin::TYPE_NAME
    }

    fn instance_id(&self) -> &str {
        &self.instance_id
    }
}

// Plugin

pub struct WeComRobotPlugin;

impl WeComRobotPlugin {
    pub const TYPE_NAME: &'static str = "wecom robot";
}

impl ChannelPlugin for WeComRobotPlugin {
    fn name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn display_name(&self) -> &str {
        "WeCom Robot"
    }

    fn description(&self) -> &str {
        "Sends notifications using WeCom group robot"
    }

    fn options(&self) -> Vec<SettingOption> {
        vec![
            SettingOption {
                label: "Webhook",
                property_name: "webhook",
                description: None,
                placeholder: Some("Your WeCom Group Robot Webhook URL"),
                required: true,
            },
            SettingOption {
                label: "UserId",
                property_name: "userid",
                description: Some("You can enter multiple UserId using a \";\" separator"),
                placeholder: None,
                required: false,
            },
            SettingOption {
                label: "Mobile",
                property_name: "mobile",
                description: Some("You can enter multiple phone number using a \";\" separator"),
                placeholder: None,
                required: false,
            },
        ]
    }

    fn validate_config(&self, config: &Value) -> Result<()> {
        let settings = WeComRobotSettings::from_value(config)?;
        NotificationConfig::try_from(&settings)?;
        Ok(())
    }

    fn create_channel(
        &self,
        instance_id: &str,
        config: &Value,
        transport: Arc<dyn WebhookTransport>,
    ) -> Result<Box<dyn NotificationChannel>> {
        let settings = WeComRobotSettings::from_value(config)?;
        let config = NotificationConfig::try_from(&settings)?;
        Ok(Box::new(WeComRobotChannel::new(instance_id, config, transport)))
    }

    fn redact_config(&self, config: &Value) -> Value {
        let mut redacted = config.clone();
        if let Some(obj) = redacted.as_object_mut() {
            let masked = obj
                .get("webhook")
                .and_then(Value::as_str)
                .map(redact_webhook_key);
            if let Some(masked) = masked {
                obj.insert("webhook".to_string(), Value::String(masked));
            }
        }
        redacted
    }
}
