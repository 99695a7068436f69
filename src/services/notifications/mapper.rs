//! Maps an Icinga notification request to an ntfy message.

use std::sync::Arc;

use reqwest::Url;

use super::provider::{OutboundMessage, ViewAction};
use crate::config::{CHANNEL_ADDRESS_TYPE, NtfyConfig};
use crate::error::{AppError, AppResult};
use crate::models::{Contact, EventType, NotificationRequest, Object, Priority, Severity};

/// How a severity is presented: display label, emoji tag and derived priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityFormat {
    pub display: &'static str,
    pub tag: &'static str,
    pub priority: Priority,
}

/// Format a severity for a host check or a service check
///
/// Host checks report `UP`/`DOWN` where service checks report `OK`/`CRITICAL`.
pub fn format_severity(severity: Severity, is_service: bool) -> SeverityFormat {
    let (display, tag, priority) = match severity {
        Severity::Crit if is_service => ("CRITICAL", "bangbang", Priority::Urgent),
        Severity::Crit => ("DOWN", "bangbang", Priority::Urgent),
        Severity::Warning => ("WARNING", "warning", Priority::High),
        Severity::Ok if is_service => ("OK", "white_check_mark", Priority::Default),
        Severity::Ok => ("UP", "white_check_mark", Priority::Default),
        Severity::Down => ("DOWN", "bangbang", Priority::Urgent),
        Severity::Unknown => ("UNKNOWN", "question", Priority::Urgent),
    };

    SeverityFormat {
        display,
        tag,
        priority,
    }
}

/// Builds outbound messages from notification requests
#[derive(Debug, Clone)]
pub struct EventMapper {
    config: Arc<NtfyConfig>,
}

impl EventMapper {
    pub fn new(config: Arc<NtfyConfig>) -> Self {
        Self { config }
    }

    /// Map one request to the message to send
    ///
    /// # Errors
    /// - `MissingAddress` when the contact has no ntfy address
    /// - `UnsupportedEvent` when the event type is not configured to notify
    pub fn map(&self, request: &NotificationRequest) -> AppResult<OutboundMessage> {
        let address = resolve_address(&request.contact)?;

        let severity = request
            .incident
            .as_ref()
            .map(|incident| Severity::parse(&incident.severity))
            .unwrap_or(Severity::Unknown);
        let format = format_severity(severity, request.object.service().is_some());

        let event = &request.event.kind;
        let priority = self.priority_for(event, format.priority)?;

        let mut tags = vec![format.tag.to_string()];
        if *event != EventType::State {
            tags.push(event.to_string());
        }

        Ok(OutboundMessage {
            address: address.to_string(),
            title: title(&request.object, format.display),
            body: body(&request.event.message),
            priority,
            tags,
            action: self.action(&request.object.url),
            markdown: true,
        })
    }

    /// Pick the priority for an event, or refuse events nobody asked for
    ///
    /// A per-event override always wins. Otherwise state events keep the
    /// severity-derived priority and other alert-worthy events use the
    /// configured default priority.
    fn priority_for(&self, event: &EventType, severity_priority: Priority) -> AppResult<Priority> {
        if let Some(priority) = self.config.priority_override(event) {
            return Ok(priority);
        }

        if !self.config.is_alert_worthy(event) {
            return Err(AppError::UnsupportedEvent {
                event_type: event.to_string(),
            });
        }

        if *event == EventType::State {
            Ok(severity_priority)
        } else {
            Ok(self.config.default_priority)
        }
    }

    /// Action button pointing at the object, rebased onto the public Icinga URL
    fn action(&self, object_url: &str) -> Option<ViewAction> {
        let object_url = object_url.trim();
        if object_url.is_empty() {
            return None;
        }

        let url = match (&self.config.icinga_server_url, Url::parse(object_url)) {
            (Some(public), Ok(internal)) => rebase(&internal, public),
            (Some(public), Err(_)) if object_url.starts_with('/') => {
                rebase(&public.join(object_url).ok()?, public)
            }
            (Some(public), Err(_)) => public.join(object_url).ok()?,
            (None, Ok(internal)) => internal,
            (None, Err(_)) => return None,
        };

        Some(ViewAction::new(url))
    }
}

/// First address typed for this channel; the type match ignores case
pub fn resolve_address(contact: &Contact) -> AppResult<&str> {
    contact
        .addresses
        .iter()
        .find(|address| {
            address.kind.eq_ignore_ascii_case(CHANNEL_ADDRESS_TYPE)
                && !address.address.trim().is_empty()
        })
        .map(|address| address.address.trim())
        .ok_or_else(|| AppError::MissingAddress {
            channel: CHANNEL_ADDRESS_TYPE.to_string(),
            contact: contact.full_name.clone(),
        })
}

fn title(object: &Object, display: &str) -> String {
    match object.service() {
        Some(service) => format!("{} on {} is {}", service, object.host(), display),
        None => format!("{} is {}", object.host(), display),
    }
}

/// Wrap the event message in a code block so clients render it monospaced
fn body(message: &str) -> String {
    format!("```\n{}\n```", message)
}

/// Move `internal` onto the public base URL
///
/// Scheme, host and port come from `public` and its path is kept as a
/// prefix, so `https://gw.example.com/icinga` turns `/icingaweb2/x` into
/// `https://gw.example.com/icinga/icingaweb2/x`. Query and fragment come
/// from `internal`.
fn rebase(internal: &Url, public: &Url) -> Url {
    let mut url = public.clone();
    let prefix = public.path().trim_end_matches('/');
    url.set_path(&format!("{}{}", prefix, internal.path()));
    url.set_query(internal.query());
    url.set_fragment(internal.fragment());
    url
}
