use crate::error::{NotifyError, Result};
use crate::transport::WebhookTransport;
use crate::NotificationChannel;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// One setting field a plugin accepts, as shown by the host's settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingOption {
    pub label: &'static str,
    pub property_name: &'static str,
    pub description: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub required: bool,
}

/// Factory for creating [`NotificationChannel`] instances from JSON
/// settings.
///
/// Each plugin is registered in the [`ChannelRegistry`] by its `name()`.
/// The host validates and instantiates channels through the matching plugin.
pub trait ChannelPlugin: Send + Sync {
    /// Returns the plugin type name (e.g., `"wecom robot"`).
    fn name(&self) -> &str;

    fn display_name(&self) -> &str;

    fn description(&self) -> &str;

    /// Declares the settings fields this plugin reads.
    fn options(&self) -> Vec<SettingOption>;

    /// Validates a JSON settings blob against this plugin's expected schema.
    fn validate_config(&self, config: &Value) -> Result<()>;

    /// Creates a configured channel instance from a JSON settings blob.
    /// `instance_id` is the host's identifier for this channel instance.
    fn create_channel(
        &self,
        instance_id: &str,
        config: &Value,
        transport: Arc<dyn WebhookTransport>,
    ) -> Result<Box<dyn NotificationChannel>>;

    /// Returns a copy of `config` with secrets redacted. Used for API responses.
    fn redact_config(&self, config: &Value) -> Value {
        config.clone()
    }
}

/// Registry of available [`ChannelPlugin`]s, filled by explicit
/// [`ChannelRegistry::register`] calls during host startup.
///
/// # Examples
///
/// ```
/// use wecom_notify::plugin::ChannelRegistry;
///
/// let registry = ChannelRegistry::default();
/// assert!(registry.has_plugin("wecom robot"));
/// assert!(!registry.has_plugin("nonexistent"));
/// assert!(!ChannelRegistry::new().has_plugin("wecom robot"));
/// ```
pub struct ChannelRegistry {
    plugins: HashMap<String, Box<dyn ChannelPlugin>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    pub fn register(&mut self, plugin: Box<dyn ChannelPlugin>) {
        let name = plugin.name().to_string();
        tracing::debug!(plugin = %name, "Registered notification channel plugin");
        self.plugins.insert(name, plugin);
    }

    pub fn create_channel(
        &self,
        type_name: &str,
        instance_id: &str,
        config: &Value,
        transport: Arc<dyn WebhookTransport>,
    ) -> Result<Box<dyn NotificationChannel>> {
        let plugin = self
            .plugins
            .get(type_name)
            .ok_or_else(|| NotifyError::UnknownChannelType(type_name.to_string()))?;
        plugin.validate_config(config)?;
        plugin.create_channel(instance_id, config, transport)
    }

    pub fn has_plugin(&self, type_name: &str) -> bool {
        self.plugins.contains_key(type_name)
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::channels::wecom_robot::WeComRobotPlugin));
        registry
    }
}
