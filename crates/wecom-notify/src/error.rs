use std::path::PathBuf;

/// Errors that can occur within the notification subsystem.
///
/// # Examples
///
/// ```rust
/// use wecom_notify::error::NotifyError;
///
/// let err = NotifyError::Validation("Could not find webhook in settings".to_string());
/// assert!(err.to_string().contains("webhook"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Channel settings are missing a required field or contain an invalid value.
    #[error("Notify: invalid channel settings: {0}")]
    Validation(String),

    /// The channel type is not registered in the plugin registry.
    #[error("Notify: unknown channel type '{0}'")]
    UnknownChannelType(String),

    /// A message payload could not be encoded to JSON.
    #[error("Notify: failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The webhook transport reported a failure for one of the messages.
    #[error("Notify: failed to deliver {message} message: {source}")]
    Delivery {
        message: &'static str,
        #[source]
        source: TransportError,
    },

    /// The rendered image existed but could not be read.
    #[error("Notify: failed to read image {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by a [`crate::transport::WebhookTransport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request could not be sent or its response could not be read.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The webhook answered 2xx but the payload carried a non-zero `errcode`.
    #[error("WeCom API error: errcode={code}, errmsg={message}")]
    Api { code: i64, message: String },
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
