//! Plugin description reported to the notification daemon in `GetInfo`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::settings::{
    DEFAULT_NTFY_SERVER, DEFAULT_PRIORITY, DEFAULT_RESPONSE_STATUS_CODES, alert_on_key,
    priority_events_key,
};
use crate::models::{EventType, Priority};

pub const PLUGIN_NAME: &str = "Ntfy.sh";
pub const PLUGIN_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

const LOCALE: &str = "en_US";

/// Name, version and configuration schema of the plugin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginInfo {
    #[serde(rename = "display_name")]
    pub name: String,
    pub version: String,
    pub author: String,
    #[serde(rename = "config_attrs")]
    pub config_attributes: Vec<ConfigOption>,
}

impl PluginInfo {
    pub fn option(&self, name: &str) -> Option<&ConfigOption> {
        self.config_attributes.iter().find(|option| option.name == name)
    }
}

/// Kind of form element the daemon renders for an option
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Secret,
    Bool,
    /// Single choice
    Option,
    /// Multiple choice
    Options,
}

/// One configuration field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OptionType,
    pub label: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub help: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl ConfigOption {
    fn new(name: &str, kind: OptionType, label: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            label: BTreeMap::from([(LOCALE.to_string(), label.to_string())]),
            help: BTreeMap::from([(LOCALE.to_string(), help.to_string())]),
            default: None,
            required: false,
            options: BTreeMap::new(),
        }
    }

    fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self
    }
}

/// Option set shared by every event-type multi-select
fn event_type_options() -> impl Iterator<Item = (String, String)> {
    EventType::KNOWN
        .into_iter()
        .map(|event| (event.as_str().to_string(), event.label().to_string()))
}

/// Option set for priority single-selects (`"1"` to `"5"`)
fn priority_options() -> impl Iterator<Item = (String, String)> {
    Priority::DESCENDING
        .into_iter()
        .map(|priority| (u8::from(priority).to_string(), priority.config_name().to_string()))
}

/// Sentence fragment describing an event in help texts
fn event_help(event: &EventType) -> String {
    match event {
        EventType::State => "a state event is thrown (default alert)".to_string(),
        EventType::AcknowledgementCleared => "an acknowledgement is removed".to_string(),
        EventType::AcknowledgementSet => "an acknowledgement is added".to_string(),
        EventType::Mute => "an incident is muted".to_string(),
        EventType::Unmute => "an incident is unmuted".to_string(),
        other => format!("a {} event is thrown", other.label().to_lowercase()),
    }
}

/// Full description of this plugin and its configuration schema
pub fn plugin_info() -> PluginInfo {
    let mut attributes = vec![
        ConfigOption::new(
            "ntfy_server",
            OptionType::String,
            "Ntfy Server",
            "ntfy server base URL (default https://ntfy.sh/)",
        )
        .default_value(DEFAULT_NTFY_SERVER)
        .required(),
        ConfigOption::new(
            "username",
            OptionType::String,
            "Username",
            "Username to authenticate with (optional).",
        ),
        ConfigOption::new(
            "password",
            OptionType::Secret,
            "Password",
            "Password to authenticate with (optional).",
        ),
        ConfigOption::new(
            "access_token",
            OptionType::Secret,
            "Access Token",
            "Access token to authenticate with (optional, not together with username and password).",
        ),
        ConfigOption::new(
            "response_status_codes",
            OptionType::String,
            "Response Status Codes",
            "Comma separated list of expected HTTP response status codes, e.g., 200,201,202,208,418",
        )
        .default_value(DEFAULT_RESPONSE_STATUS_CODES)
        .required(),
        ConfigOption::new(
            "icinga_server_url",
            OptionType::String,
            "Icinga Server URL",
            "Public Icinga Web URL used for links, e.g., https://icinga.example.com",
        ),
    ];

    for event in EventType::KNOWN {
        let Some(key) = alert_on_key(&event) else {
            continue;
        };
        attributes.push(
            ConfigOption::new(
                key,
                OptionType::Bool,
                &format!("Alert on {}", event.label()),
                &format!("Sends an alert whenever {}", event_help(&event)),
            )
            .default_value(event == EventType::State),
        );
    }

    attributes.push(
        ConfigOption::new(
            "default_priority",
            OptionType::Option,
            "Default Priority",
            "Priority of alert-worthy non-state events without a per-event priority",
        )
        .default_value(DEFAULT_PRIORITY)
        .required()
        .options(priority_options()),
    );

    for priority in Priority::DESCENDING {
        let level = priority.config_name();
        attributes.push(
            ConfigOption::new(
                priority_events_key(priority),
                OptionType::Options,
                &format!("Events to alert at {} priority", level),
                &format!(
                    "When these events are thrown, send the notification at {} priority",
                    level
                ),
            )
            .options(event_type_options()),
        );
    }

    PluginInfo {
        name: PLUGIN_NAME.to_string(),
        version: crate::pkg_version().to_string(),
        author: PLUGIN_AUTHOR.to_string(),
        config_attributes: attributes,
    }
}
