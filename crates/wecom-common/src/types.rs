use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Alert state produced by rule evaluation.
///
/// # Examples
///
/// ```
/// use wecom_common::types::AlertState;
///
/// let state: AlertState = "no_data".parse().unwrap();
/// assert_eq!(state, AlertState::NoData);
/// assert_eq!(state.to_string(), "No Data");
/// assert!(!state.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    Ok,
    Alerting,
    NoData,
    Pending,
    Paused,
    Unknown,
}

impl AlertState {
    pub fn is_ok(self) -> bool {
        self == AlertState::Ok
    }
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertState::Ok => write!(f, "OK"),
            AlertState::Alerting => write!(f, "Alerting"),
            AlertState::NoData => write!(f, "No Data"),
            AlertState::Pending => write!(f, "Pending"),
            AlertState::Paused => write!(f, "Paused"),
            AlertState::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for AlertState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(AlertState::Ok),
            "alerting" => Ok(AlertState::Alerting),
            "no_data" | "no data" => Ok(AlertState::NoData),
            "pending" => Ok(AlertState::Pending),
            "paused" => Ok(AlertState::Paused),
            "unknown" => Ok(AlertState::Unknown),
            _ => Err(format!("unknown alert state: {s}")),
        }
    }
}

/// A single metric series that matched the rule condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMatch {
    pub metric: String,
    pub value: f64,
}

impl EvalMatch {
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }
}

/// Result of evaluating one alert rule, handed to notification channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationContext {
    pub rule_name: String,
    pub state: AlertState,
    /// Message authored on the rule (e.g., "磁盘使用率超过 90%")
    #[serde(default)]
    pub rule_message: String,
    #[serde(default)]
    pub eval_matches: Vec<EvalMatch>,
    /// Error raised while evaluating the rule, if any
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub image_public_url: Option<String>,
    /// Rendered panel image written by the host's renderer
    #[serde(default)]
    pub image_on_disk_path: Option<PathBuf>,
    /// Whether the notifier should attach a rendered image
    #[serde(default)]
    pub requires_image: bool,
}

impl EvaluationContext {
    pub fn new(rule_name: impl Into<String>, state: AlertState) -> Self {
        Self {
            rule_name: rule_name.into(),
            state,
            rule_message: String::new(),
            eval_matches: Vec::new(),
            error: None,
            image_public_url: None,
            image_on_disk_path: None,
            requires_image: false,
        }
    }

    /// Short summary line used as the first line of every notification.
    ///
    /// # Examples
    ///
    /// ```
    /// use wecom_common::types::{AlertState, EvaluationContext};
    ///
    /// let ctx = EvaluationContext::new("CPU 使用率过高", AlertState::Alerting);
    /// assert_eq!(ctx.notification_title(), "[Alerting] CPU 使用率过高");
    /// ```
    pub fn notification_title(&self) -> String {
        format!("[{}] {}", self.state, self.rule_name)
    }

    /// Public image URL, treating an empty string as absent.
    pub fn public_image_url(&self) -> Option<&str> {
        self.image_public_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}
