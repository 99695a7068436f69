//! Plugin configuration structures
//!
//! `RawConfig` is what the notification daemon sends in `SetConfig` after it
//! has been overlaid on the declared defaults. `NtfyConfig` is the validated,
//! immutable value the mapper and dispatcher work with.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::models::{EventType, Priority};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh/";
pub const DEFAULT_RESPONSE_STATUS_CODES: &str = "200";
pub const DEFAULT_PRIORITY: &str = "3";

/// Address type contacts use for this channel
pub const CHANNEL_ADDRESS_TYPE: &str = "ntfy";

/// Configuration key of the `alert_on_*` flag for each event type
pub fn alert_on_key(event: &EventType) -> Option<&'static str> {
    let key = match event {
        EventType::AcknowledgementCleared => "alert_on_ack_clear",
        EventType::AcknowledgementSet => "alert_on_ack_set",
        EventType::Custom => "alert_on_custom",
        EventType::DowntimeEnd => "alert_on_downtime_end",
        EventType::DowntimeRemoved => "alert_on_downtime_removed",
        EventType::DowntimeStart => "alert_on_downtime_start",
        EventType::FlappingEnd => "alert_on_flapping_end",
        EventType::FlappingStart => "alert_on_flapping_start",
        EventType::IncidentAge => "alert_on_incident_age",
        EventType::Mute => "alert_on_mute",
        EventType::State => "alert_on_state",
        EventType::Unmute => "alert_on_unmute",
        EventType::Other(_) => return None,
    };
    Some(key)
}

/// Configuration key of the per-priority event list
pub fn priority_events_key(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "priority_max_events",
        Priority::High => "priority_high_events",
        Priority::Default => "priority_default_events",
        Priority::Low => "priority_low_events",
        Priority::Min => "priority_min_events",
    }
}

// ============================================================================
// Raw configuration
// ============================================================================

/// Event type list as sent by the daemon: a JSON array or a comma separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EventList {
    List(Vec<String>),
    Csv(String),
}

impl Default for EventList {
    fn default() -> Self {
        EventList::List(Vec::new())
    }
}

impl EventList {
    /// Non-empty entries, trimmed
    pub fn entries(&self) -> Vec<&str> {
        let items: Vec<&str> = match self {
            EventList::List(items) => items.iter().map(String::as_str).collect(),
            EventList::Csv(raw) => raw.split(',').collect(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Configuration fields as received, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    pub ntfy_server: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub access_token: String,
    pub response_status_codes: String,
    #[serde(default)]
    pub icinga_server_url: String,

    #[serde(default)]
    pub alert_on_ack_clear: bool,
    #[serde(default)]
    pub alert_on_ack_set: bool,
    #[serde(default)]
    pub alert_on_custom: bool,
    #[serde(default)]
    pub alert_on_downtime_end: bool,
    #[serde(default)]
    pub alert_on_downtime_removed: bool,
    #[serde(default)]
    pub alert_on_downtime_start: bool,
    #[serde(default)]
    pub alert_on_flapping_end: bool,
    #[serde(default)]
    pub alert_on_flapping_start: bool,
    #[serde(default)]
    pub alert_on_incident_age: bool,
    #[serde(default)]
    pub alert_on_mute: bool,
    #[serde(default = "default_true")]
    pub alert_on_state: bool,
    #[serde(default)]
    pub alert_on_unmute: bool,

    pub default_priority: String,
    #[serde(default)]
    pub priority_max_events: EventList,
    #[serde(default)]
    pub priority_high_events: EventList,
    #[serde(default)]
    pub priority_default_events: EventList,
    #[serde(default)]
    pub priority_low_events: EventList,
    #[serde(default)]
    pub priority_min_events: EventList,
}

fn default_true() -> bool {
    true
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            ntfy_server: DEFAULT_NTFY_SERVER.to_string(),
            username: String::new(),
            password: String::new(),
            access_token: String::new(),
            response_status_codes: DEFAULT_RESPONSE_STATUS_CODES.to_string(),
            icinga_server_url: String::new(),
            alert_on_ack_clear: false,
            alert_on_ack_set: false,
            alert_on_custom: false,
            alert_on_downtime_end: false,
            alert_on_downtime_removed: false,
            alert_on_downtime_start: false,
            alert_on_flapping_end: false,
            alert_on_flapping_start: false,
            alert_on_incident_age: false,
            alert_on_mute: false,
            alert_on_state: true,
            alert_on_unmute: false,
            default_priority: DEFAULT_PRIORITY.to_string(),
            priority_max_events: EventList::default(),
            priority_high_events: EventList::default(),
            priority_default_events: EventList::default(),
            priority_low_events: EventList::default(),
            priority_min_events: EventList::default(),
        }
    }
}

impl RawConfig {
    /// Value of the `alert_on_*` flag for a known event type
    pub fn alert_on(&self, event: &EventType) -> bool {
        match event {
            EventType::AcknowledgementCleared => self.alert_on_ack_clear,
            EventType::AcknowledgementSet => self.alert_on_ack_set,
            EventType::Custom => self.alert_on_custom,
            EventType::DowntimeEnd => self.alert_on_downtime_end,
            EventType::DowntimeRemoved => self.alert_on_downtime_removed,
            EventType::DowntimeStart => self.alert_on_downtime_start,
            EventType::FlappingEnd => self.alert_on_flapping_end,
            EventType::FlappingStart => self.alert_on_flapping_start,
            EventType::IncidentAge => self.alert_on_incident_age,
            EventType::Mute => self.alert_on_mute,
            EventType::State => self.alert_on_state,
            EventType::Unmute => self.alert_on_unmute,
            EventType::Other(_) => false,
        }
    }

    /// Event list configured for a priority level
    pub fn priority_events(&self, priority: Priority) -> &EventList {
        match priority {
            Priority::Urgent => &self.priority_max_events,
            Priority::High => &self.priority_high_events,
            Priority::Default => &self.priority_default_events,
            Priority::Low => &self.priority_low_events,
            Priority::Min => &self.priority_min_events,
        }
    }
}

// ============================================================================
// Validated configuration
// ============================================================================

/// How requests to the ntfy server authenticate
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}

impl Credentials {
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Anonymous => "none",
            Credentials::Basic { .. } => "basic",
            Credentials::Bearer { .. } => "bearer",
        }
    }
}

/// Validated plugin configuration, immutable once built
#[derive(Debug, Clone)]
pub struct NtfyConfig {
    /// Server base URL, always ending with `/`
    pub ntfy_server: String,
    pub credentials: Credentials,
    /// Accepted response codes in configured order
    pub response_status_codes: Vec<u16>,
    /// Public base URL used to rewrite links in the action button
    pub icinga_server_url: Option<Url>,
    pub alert_on: HashSet<EventType>,
    pub default_priority: Priority,
    pub priority_overrides: BTreeMap<Priority, HashSet<EventType>>,
}

impl Default for NtfyConfig {
    fn default() -> Self {
        Self {
            ntfy_server: DEFAULT_NTFY_SERVER.to_string(),
            credentials: Credentials::Anonymous,
            response_status_codes: vec![200],
            icinga_server_url: None,
            alert_on: HashSet::from([EventType::State]),
            default_priority: Priority::Default,
            priority_overrides: BTreeMap::new(),
        }
    }
}

impl NtfyConfig {
    pub fn accepts_status(&self, code: u16) -> bool {
        self.response_status_codes.contains(&code)
    }

    pub fn is_alert_worthy(&self, event: &EventType) -> bool {
        self.alert_on.contains(event)
    }

    /// Highest priority level whose event list names `event`
    pub fn priority_override(&self, event: &EventType) -> Option<Priority> {
        Priority::DESCENDING.into_iter().find(|priority| {
            self.priority_overrides
                .get(priority)
                .is_some_and(|events| events.contains(event))
        })
    }

    /// JSON view of the configuration with secrets redacted
    pub fn summary(&self) -> Value {
        let mut alert_on: Vec<&str> = self.alert_on.iter().map(EventType::as_str).collect();
        alert_on.sort_unstable();

        let overrides: BTreeMap<&str, Vec<&str>> = self
            .priority_overrides
            .iter()
            .map(|(priority, events)| {
                let mut names: Vec<&str> = events.iter().map(EventType::as_str).collect();
                names.sort_unstable();
                (priority.config_name(), names)
            })
            .collect();

        let username = match &self.credentials {
            Credentials::Basic { username, .. } => Some(username.as_str()),
            _ => None,
        };

        json!({
            "ntfy_server": self.ntfy_server,
            "auth": self.credentials.kind(),
            "username": username,
            "response_status_codes": self.response_status_codes,
            "icinga_server_url": self.icinga_server_url.as_ref().map(Url::as_str),
            "alert_on": alert_on,
            "default_priority": self.default_priority.config_name(),
            "priority_overrides": overrides,
        })
    }
}

/// Serializable shape of `summary()`, used by tests and the `check` command
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigSummary {
    pub ntfy_server: String,
    pub auth: String,
    pub username: Option<String>,
    pub response_status_codes: Vec<u16>,
    pub icinga_server_url: Option<String>,
    pub alert_on: Vec<String>,
    pub default_priority: String,
    pub priority_overrides: BTreeMap<String, Vec<String>>,
}
