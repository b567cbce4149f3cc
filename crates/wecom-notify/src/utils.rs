//! Utility functions for notification channels

/// Maximum length of a webhook response body kept in errors and logs
pub const MAX_BODY_LENGTH: usize = 4000;

/// Truncate a string to at most `max_len` bytes, snapping back to a char boundary
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}

/// Masks the `key` query parameter of a robot webhook URL.
///
/// The key is the robot's only credential, so it must not appear in API
/// responses or logs.
///
/// # Examples
///
/// ```
/// use wecom_notify::utils::redact_webhook_key;
///
/// assert_eq!(
///     redact_webhook_key("https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=abc&debug=1"),
///     "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=***&debug=1"
/// );
/// ```
pub fn redact_webhook_key(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return url.to_string();
    };
    if parsed.query().is_none() {
        return url.to_string();
    }
    // Names are compared after percent-decoding, so `%6Bey` is masked too.
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}
