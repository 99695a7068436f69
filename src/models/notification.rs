//! Notification request model sent by the Icinga Notifications daemon.
//!
//! These types mirror the JSON the daemon passes to `SendNotification`,
//! plus the small enums (event type, severity, priority) the mapper works on.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Inbound request
// ============================================================================

/// Read an explicit `null` as the field's default
///
/// The daemon encodes empty maps and lists as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One notification to deliver to one contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub contact: Contact,
    pub object: Object,
    /// Absent for events that are not tied to an incident
    #[serde(default)]
    pub incident: Option<Incident>,
    pub event: Event,
}

/// Recipient of the notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,
}

/// Typed address of a contact, e.g. `{ "type": "ntfy", "address": "alerts" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
}

/// Monitored object (host or service) the event is about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Object {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_tags: HashMap<String, String>,
}

impl Object {
    /// Non-empty value of a tag
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Host name, falling back to the object name when the `host` tag is missing
    pub fn host(&self) -> &str {
        self.tag("host").unwrap_or(&self.name)
    }

    /// Service name, present only for service checks
    pub fn service(&self) -> Option<&str> {
        self.tag("service")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub time: Option<jiff::Timestamp>,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Event type
// ============================================================================

/// Type of event fired by the daemon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    AcknowledgementCleared,
    AcknowledgementSet,
    Custom,
    DowntimeEnd,
    DowntimeRemoved,
    DowntimeStart,
    FlappingEnd,
    FlappingStart,
    IncidentAge,
    Mute,
    State,
    Unmute,
    /// Event type this plugin does not know about
    Other(String),
}

impl EventType {
    /// Every event type the plugin can be configured for
    pub const KNOWN: [EventType; 12] = [
        EventType::AcknowledgementCleared,
        EventType::AcknowledgementSet,
        EventType::Custom,
        EventType::DowntimeEnd,
        EventType::DowntimeRemoved,
        EventType::DowntimeStart,
        EventType::FlappingEnd,
        EventType::FlappingStart,
        EventType::IncidentAge,
        EventType::Mute,
        EventType::State,
        EventType::Unmute,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventType::AcknowledgementCleared => "acknowledgement-cleared",
            EventType::AcknowledgementSet => "acknowledgement-set",
            EventType::Custom => "custom",
            EventType::DowntimeEnd => "downtime-end",
            EventType::DowntimeRemoved => "downtime-removed",
            EventType::DowntimeStart => "downtime-start",
            EventType::FlappingEnd => "flapping-end",
            EventType::FlappingStart => "flapping-start",
            EventType::IncidentAge => "incident-age",
            EventType::Mute => "mute",
            EventType::State => "state",
            EventType::Unmute => "unmute",
            EventType::Other(other) => other,
        }
    }

    /// Human readable label used in the plugin's option lists
    pub fn label(&self) -> &str {
        match self {
            EventType::AcknowledgementCleared => "Acknowledgement Cleared",
            EventType::AcknowledgementSet => "Acknowledgement Set",
            EventType::Custom => "Custom",
            EventType::DowntimeEnd => "Downtime End",
            EventType::DowntimeRemoved => "Downtime Removed",
            EventType::DowntimeStart => "Downtime Start",
            EventType::FlappingEnd => "Flapping End",
            EventType::FlappingStart => "Flapping Start",
            EventType::IncidentAge => "Incident Age",
            EventType::Mute => "Mute",
            EventType::State => "State",
            EventType::Unmute => "Unmute",
            EventType::Other(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        EventType::KNOWN
            .iter()
            .find(|known| known.as_str() == value)
            .cloned()
            .unwrap_or(EventType::Other(value))
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Incident severity as far as the mapper distinguishes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warning,
    Crit,
    Down,
    Unknown,
}

impl Severity {
    pub fn parse(value: &str) -> Self {
        match value {
            "ok" => Severity::Ok,
            "warning" => Severity::Warning,
            "crit" => Severity::Crit,
            "down" => Severity::Down,
            _ => Severity::Unknown,
        }
    }
}

// ============================================================================
// Priority
// ============================================================================

/// ntfy message priority, 1 (min) to 5 (urgent, also called max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Priority {
    Min = 1,
    Low = 2,
    Default = 3,
    High = 4,
    Urgent = 5,
}

impl Priority {
    /// Levels from highest to lowest
    pub const DESCENDING: [Priority; 5] = [
        Priority::Urgent,
        Priority::High,
        Priority::Default,
        Priority::Low,
        Priority::Min,
    ];

    /// Value of the `Priority` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Min => "min",
            Priority::Low => "low",
            Priority::Default => "default",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Name of the level in the plugin configuration (`max` rather than `urgent`)
    pub fn config_name(&self) -> &'static str {
        match self {
            Priority::Urgent => "max",
            other => other.as_str(),
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value as u8
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "min" => Ok(Priority::Min),
            "2" | "low" => Ok(Priority::Low),
            "3" | "default" => Ok(Priority::Default),
            "4" | "high" => Ok(Priority::High),
            "5" | "max" | "urgent" => Ok(Priority::Urgent),
            other => Err(format!(
                "'{}' is not a priority. Expected 1-5 or one of: min, low, default, high, max",
                other
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_deserializes_daemon_payload() {
        let payload = json!({
            "contact": {
                "full_name": "Jane Doe",
                "addresses": [{ "type": "ntfy", "address": "alerts" }]
            },
            "object": {
                "name": "web1!http",
                "url": "http://localhost/icingadb/service?name=http&host.name=web1",
                "tags": { "host": "web1", "service": "http" },
                "extra_tags": {}
            },
            "incident": { "id": 42, "url": "http://localhost/incident?id=42", "severity": "crit" },
            "event": {
                "time": "2024-05-01T10:00:00Z",
                "type": "state",
                "username": "",
                "message": "HTTP CRITICAL - connection refused"
            }
        });

        let request: NotificationRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.contact.addresses[0].kind, "ntfy");
        assert_eq!(request.object.host(), "web1");
        assert_eq!(request.object.service(), Some("http"));
        assert_eq!(request.incident.unwrap().severity, "crit");
        assert_eq!(request.event.kind, EventType::State);
        assert!(request.event.time.is_some());
    }

    #[test]
    fn test_request_without_incident() {
        let payload = json!({
            "contact": { "full_name": "Jane", "addresses": [] },
            "object": { "name": "web1", "tags": { "host": "web1" } },
            "event": { "type": "custom", "message": "hello" }
        });

        let request: NotificationRequest = serde_json::from_value(payload).unwrap();
        assert!(request.incident.is_none());
        assert_eq!(request.event.kind, EventType::Custom);
        assert_eq!(request.object.service(), None);
    }

    #[test]
    fn test_null_collections_read_as_empty() {
        let payload = json!({
            "contact": { "full_name": "Jane", "addresses": null },
            "object": { "name": "web1", "url": "", "tags": null, "extra_tags": null },
            "incident": null,
            "event": { "type": "state", "message": "down" }
        });

        let request: NotificationRequest = serde_json::from_value(payload).unwrap();
        assert!(request.contact.addresses.is_empty());
        assert!(request.object.tags.is_empty());
        assert!(request.object.extra_tags.is_empty());
        assert_eq!(request.object.host(), "web1");
    }

    #[test]
    fn test_object_host_falls_back_to_name() {
        let object = Object {
            name: "db1".to_string(),
            ..Default::default()
        };
        assert_eq!(object.host(), "db1");
    }

    #[test]
    fn test_empty_service_tag_is_host_check() {
        let mut object = Object::default();
        object.tags.insert("service".to_string(), String::new());
        assert_eq!(object.service(), None);
    }

    #[test]
    fn test_event_type_round_trips_unknown_values() {
        let kind: EventType = serde_json::from_value(json!("internal")).unwrap();
        assert_eq!(kind, EventType::Other("internal".to_string()));
        assert!(!kind.is_known());
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("internal"));
    }

    #[test]
    fn test_known_event_types_parse() {
        for known in EventType::KNOWN {
            assert_eq!(EventType::from(known.as_str().to_string()), known);
        }
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("crit"), Severity::Crit);
        assert_eq!(Severity::parse("warning"), Severity::Warning);
        assert_eq!(Severity::parse("ok"), Severity::Ok);
        assert_eq!(Severity::parse("down"), Severity::Down);
        assert_eq!(Severity::parse("emerg"), Severity::Unknown);
        assert_eq!(Severity::parse(""), Severity::Unknown);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("3".parse::<Priority>().unwrap(), Priority::Default);
        assert_eq!("max".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("Urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" 1 ".parse::<Priority>().unwrap(), Priority::Min);
        assert!("6".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_names() {
        assert_eq!(Priority::Urgent.as_str(), "urgent");
        assert_eq!(Priority::Urgent.config_name(), "max");
        assert_eq!(u8::from(Priority::High), 4);
    }
}
