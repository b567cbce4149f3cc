//! Wire payloads accepted by the WeCom group robot webhook.

use base64::Engine;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// A robot message, tagged by `msgtype` on the wire:
///
/// ```json
/// {"msgtype": "text", "text": {"content": "...", "mentioned_list": [], "mentioned_mobile_list": []}}
/// {"msgtype": "image", "image": {"base64": "...", "md5": "..."}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum RobotMessage {
    Text { text: TextContent },
    Image { image: ImageContent },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    pub mentioned_list: Vec<String>,
    pub mentioned_mobile_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub base64: String,
    /// Lowercase hex MD5 of the raw image bytes
    pub md5: String,
}

impl ImageContent {
    /// Encodes raw image bytes for the `image` message.
    ///
    /// # Examples
    ///
    /// ```
    /// use wecom_notify::message::ImageContent;
    ///
    /// let image = ImageContent::from_bytes(b"abc");
    /// assert_eq!(image.base64, "YWJj");
    /// assert_eq!(image.md5, "900150983cd24fb0d6963f7d28e17f72");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            md5: format!("{:x}", Md5::digest(bytes)),
        }
    }
}

impl RobotMessage {
    pub fn text(
        content: String,
        mentioned_list: Vec<String>,
        mentioned_mobile_list: Vec<String>,
    ) -> Self {
        RobotMessage::Text {
            text: TextContent {
                content,
                mentioned_list,
                mentioned_mobile_list,
            },
        }
    }

    pub fn image(bytes: &[u8]) -> Self {
        RobotMessage::Image {
            image: ImageContent::from_bytes(bytes),
        }
    }

    /// Short name used in logs and [`crate::error::NotifyError::Delivery`].
    pub fn kind(&self) -> &'static str {
        match self {
            RobotMessage::Text { .. } => "text",
            RobotMessage::Image { .. } => "image",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
