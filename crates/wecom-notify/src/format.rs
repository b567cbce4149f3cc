//! Renders an evaluation result into robot message text.

use crate::config::NotificationConfig;
use wecom_common::types::{EvalMatch, EvaluationContext};

/// Maximum number of metric matches listed before truncating with `...`.
pub const MAX_LISTED_MATCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedContent {
    pub content: String,
    pub mentioned_list: Vec<String>,
    pub mentioned_mobile_list: Vec<String>,
}

/// Builds the text body and mention lists for one notification.
///
/// Sections are joined by a blank line, and sections without data are
/// left out entirely.
pub fn format_content(ctx: &EvaluationContext, config: &NotificationConfig) -> FormattedContent {
    let mut sections = vec![ctx.notification_title()];

    if !ctx.state.is_ok() {
        sections.push(format!("Message:\n  {}", ctx.rule_message));
    }

    if !ctx.eval_matches.is_empty() {
        sections.push(format_matches(&ctx.eval_matches));
    }

    if let Some(error) = &ctx.error {
        sections.push(format!("Error:\n  {error}"));
    }

    if ctx.requires_image {
        if let Some(url) = ctx.public_image_url() {
            sections.push(format!("ImageUrl:\n  {url}"));
        }
    }

    FormattedContent {
        content: sections.join("\n\n"),
        mentioned_list: config.mentioned_users().to_vec(),
        mentioned_mobile_list: config.mentioned_mobiles().to_vec(),
    }
}

fn format_matches(matches: &[EvalMatch]) -> String {
    let mut lines = vec!["Metric:".to_string()];
    lines.extend(
        matches
            .iter()
            .take(MAX_LISTED_MATCHES)
            .map(|m| format!("  {}={}", m.metric, format_value(m.value))),
    );
    if matches.len() > MAX_LISTED_MATCHES {
        lines.push("  ...".to_string());
    }
    lines.join("\n")
}

/// Shortest decimal form that round-trips, never in exponent notation.
fn format_value(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    value.to_string()
}
