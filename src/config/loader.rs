//! Configuration loader
//!
//! Layers the configuration the notification daemon sends over the declared
//! defaults using the `config` crate, then validates the result.

use std::path::Path;

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde_json::{Map, Value};

use crate::config::error::ConfigError;
use crate::config::settings::{
    DEFAULT_NTFY_SERVER, DEFAULT_PRIORITY, DEFAULT_RESPONSE_STATUS_CODES, NtfyConfig, RawConfig,
    alert_on_key, priority_events_key,
};
use crate::models::{EventType, Priority};

/// Configuration loader that overlays user supplied fields on the defaults
///
/// Sources, in order of priority (lowest first):
/// 1. Declared defaults
/// 2. Fields present in the `SetConfig` payload (null and empty strings are ignored)
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate configuration from the raw `SetConfig` payload
    ///
    /// An empty array, empty object or `null` payload keeps every default.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the payload is neither an object nor one of the empty forms above
    /// - a field has the wrong type
    /// - configuration validation fails
    pub fn load(&self, raw: &Value) -> Result<NtfyConfig, ConfigError> {
        let overrides = Self::overrides(raw)?;
        let config = Self::build_config(&overrides)?;

        let settings: RawConfig = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()
    }

    /// Load and validate configuration from a JSON file
    pub fn load_file(&self, path: &Path) -> Result<NtfyConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let raw: Value = serde_json::from_str(&content).map_err(|e| {
            ConfigError::ParseError(format!("{} is not valid JSON: {}", path.display(), e))
        })?;

        self.load(&raw)
    }

    /// Keep only the fields that carry a value
    fn overrides(raw: &Value) -> Result<Map<String, Value>, ConfigError> {
        let fields = match raw {
            Value::Null => return Ok(Map::new()),
            Value::Array(items) if items.is_empty() => return Ok(Map::new()),
            Value::Object(fields) => fields,
            other => {
                return Err(ConfigError::ParseError(format!(
                    "Expected a JSON object, got {}",
                    other
                )));
            }
        };

        Ok(fields
            .iter()
            .filter(|(_, value)| match value {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                _ => true,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    /// Build the config::Config instance from defaults and overrides
    fn build_config(overrides: &Map<String, Value>) -> Result<Config, ConfigError> {
        let builder = Self::add_defaults(Config::builder())?;

        let builder = if overrides.is_empty() {
            builder
        } else {
            let json = Value::Object(overrides.clone()).to_string();
            builder.add_source(File::from_str(&json, FileFormat::Json))
        };

        builder.build().map_err(ConfigError::from)
    }

    fn add_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mut builder = builder
            .set_default("ntfy_server", DEFAULT_NTFY_SERVER)?
            .set_default("username", "")?
            .set_default("password", "")?
            .set_default("access_token", "")?
            .set_default("response_status_codes", DEFAULT_RESPONSE_STATUS_CODES)?
            .set_default("icinga_server_url", "")?
            .set_default("default_priority", DEFAULT_PRIORITY)?;

        for event in EventType::KNOWN {
            if let Some(key) = alert_on_key(&event) {
                builder = builder.set_default(key, event == EventType::State)?;
            }
        }

        for priority in Priority::DESCENDING {
            builder = builder.set_default(priority_events_key(priority), Vec::<String>::new())?;
        }

        Ok(builder)
    }
}
