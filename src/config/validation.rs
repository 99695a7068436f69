//! Configuration validation logic
//!
//! Turns a `RawConfig` into an immutable `NtfyConfig`, rejecting anything the
//! dispatcher could not act on.

use std::collections::{BTreeMap, HashSet};

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{Credentials, NtfyConfig, RawConfig, priority_events_key};
use crate::models::{EventType, Priority};

/// URL schemes the dispatcher can post to
const VALID_URL_SCHEMES: &[&str] = &["http", "https"];

impl RawConfig {
    /// Validate all fields and build the immutable configuration
    ///
    /// # Validation Rules
    /// - `ntfy_server` must be an absolute http(s) URL; a trailing `/` is appended
    /// - `icinga_server_url`, when set, must be an absolute http(s) URL
    /// - username and password are both empty or both set
    /// - username/password and access token are mutually exclusive
    /// - every response status code must be an integer HTTP status
    /// - `default_priority` must be 1-5 or a level name
    /// - event lists may only name known event types
    pub fn validate(&self) -> Result<NtfyConfig, ConfigError> {
        let ntfy_server = normalize_server_url(&self.ntfy_server)?;

        let icinga_server_url = match self.icinga_server_url.trim() {
            "" => None,
            raw => Some(parse_http_url("icinga_server_url", raw)?),
        };

        let credentials = credentials(&self.username, &self.password, &self.access_token)?;
        let response_status_codes = parse_status_codes(&self.response_status_codes)?;

        let default_priority: Priority = self
            .default_priority
            .parse()
            .map_err(|reason: String| ConfigError::validation("default_priority", reason))?;

        let alert_on = EventType::KNOWN
            .into_iter()
            .filter(|event| self.alert_on(event))
            .collect();

        let mut priority_overrides = BTreeMap::new();
        for priority in Priority::DESCENDING {
            let events = parse_event_list(
                priority_events_key(priority),
                &self.priority_events(priority).entries(),
            )?;
            if !events.is_empty() {
                priority_overrides.insert(priority, events);
            }
        }

        Ok(NtfyConfig {
            ntfy_server,
            credentials,
            response_status_codes,
            icinga_server_url,
            alert_on,
            default_priority,
            priority_overrides,
        })
    }
}

/// Validate the server URL and make sure it ends with `/`
///
/// Normalizing an already normalized URL returns it unchanged.
pub fn normalize_server_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    parse_http_url("ntfy_server", trimmed)?;

    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/", trimmed))
    }
}

fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|_| ConfigError::validation(field, format!("{:?} is not a valid URI", raw)))?;

    if !VALID_URL_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::validation(
            field,
            format!(
                "{:?} must use one of the schemes: {}",
                raw,
                VALID_URL_SCHEMES.join(", ")
            ),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::validation(
            field,
            format!("{:?} has no host", raw),
        ));
    }

    Ok(url)
}

/// Check the credential invariants and pick the authentication scheme
pub fn credentials(
    username: &str,
    password: &str,
    access_token: &str,
) -> Result<Credentials, ConfigError> {
    if username.is_empty() != password.is_empty() {
        return Err(ConfigError::validation(
            "username",
            "Username and password must either both be empty or both be filled out",
        ));
    }

    if !username.is_empty() && !access_token.is_empty() {
        return Err(ConfigError::mutual_exclusivity(
            "Use either username and password or an access token, not both",
        ));
    }

    let credentials = if !username.is_empty() {
        Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }
    } else if !access_token.is_empty() {
        Credentials::Bearer {
            token: access_token.to_string(),
        }
    } else {
        Credentials::Anonymous
    };

    Ok(credentials)
}

/// Parse a comma separated list of HTTP status codes, keeping order and duplicates
pub fn parse_status_codes(raw: &str) -> Result<Vec<u16>, ConfigError> {
    raw.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|code| (100..=599).contains(code))
                .ok_or_else(|| {
                    ConfigError::validation(
                        "response_status_codes",
                        format!("cannot convert status code {:?} to an HTTP status code", token),
                    )
                })
        })
        .collect()
}

fn parse_event_list(field: &str, entries: &[&str]) -> Result<HashSet<EventType>, ConfigError> {
    entries
        .iter()
        .map(|entry| {
            let event = EventType::from(entry.to_string());
            if event.is_known() {
                Ok(event)
            } else {
                Err(ConfigError::validation(
                    field,
                    format!("unknown event type {:?}", entry),
                ))
            }
        })
        .collect()
}
