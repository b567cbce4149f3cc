//! Settings for the WeCom group robot channel.

use crate::error::{NotifyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw settings blob as stored by the host, e.g.
/// `{"webhook": "https://qyapi.weixin.qq.com/...", "userid": "alice;bob"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeComRobotSettings {
    #[serde(default)]
    pub webhook: String,
    /// User ids to mention, separated by `;`
    #[serde(default)]
    pub userid: String,
    /// Mobile numbers to mention, separated by `;`
    #[serde(default)]
    pub mobile: String,
}

impl WeComRobotSettings {
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| NotifyError::Validation(format!("Invalid wecom robot settings: {e}")))
    }
}

/// Validated, immutable configuration owned by a
/// [`crate::channels::wecom_robot::WeComRobotChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    webhook: String,
    mentioned_users: Vec<String>,
    mentioned_mobiles: Vec<String>,
}

impl NotificationConfig {
    /// Builds the config from raw field values.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Validation`] when `webhook` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wecom_notify::config::NotificationConfig;
    ///
    /// let cfg = NotificationConfig::new("https://example.com/hook", " alice ; bob", "").unwrap();
    /// assert_eq!(cfg.mentioned_users(), ["alice", "bob"]);
    /// assert!(cfg.mentioned_mobiles().is_empty());
    /// assert!(NotificationConfig::new("", "", "").is_err());
    /// ```
    pub fn new(webhook: &str, userid: &str, mobile: &str) -> Result<Self> {
        if webhook.is_empty() {
            return Err(NotifyError::Validation(
                "Could not find webhook in settings".to_string(),
            ));
        }
        Ok(Self {
            webhook: webhook.to_string(),
            mentioned_users: split_mentions(userid),
            mentioned_mobiles: split_mentions(mobile),
        })
    }

    pub fn webhook(&self) -> &str {
        &self.webhook
    }

    pub fn mentioned_users(&self) -> &[String] {
        &self.mentioned_users
    }

    pub fn mentioned_mobiles(&self) -> &[String] {
        &self.mentioned_mobiles
    }
}

impl TryFrom<&WeComRobotSettings> for NotificationConfig {
    type Error = NotifyError;

    fn try_from(settings: &WeComRobotSettings) -> Result<Self> {
        Self::new(&settings.webhook, &settings.userid, &settings.mobile)
    }
}

/// Removes every space from `raw` and splits it on `;`.
///
/// An empty field yields no entries. Segments are kept as-is otherwise, so
/// `"a;;b"` yields an empty middle entry.
fn split_mentions(raw: &str) -> Vec<String> {
    let stripped = raw.replace(' ', "");
    if stripped.is_empty() {
        return Vec::new();
    }
    stripped.split(';').map(str::to_string).collect()
}
