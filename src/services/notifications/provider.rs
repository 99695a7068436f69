//! Core notification provider trait and types.
//!
//! The mapper turns an inbound notification request into an
//! `OutboundMessage`; a `NotificationProvider` delivers it.

use crate::error::AppResult;
use crate::models::Priority;
use async_trait::async_trait;
use serde::Serialize;

/// Label of the action button that opens the object in Icinga Web
pub const VIEW_ACTION_LABEL: &str = "Open Icinga";

/// Message to be sent via notification provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Topic on the ntfy server
    pub address: String,
    pub title: String,
    /// Message body, interpreted as markdown when `markdown` is set
    pub body: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub action: Option<ViewAction>,
    pub markdown: bool,
}

/// ntfy `view` action: a button that opens a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewAction {
    pub label: String,
    pub url: String,
}

impl ViewAction {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            label: VIEW_ACTION_LABEL.to_string(),
            url: url.into(),
        }
    }

    /// Value of the `Action` header in ntfy's short format
    ///
    /// The URL is quoted when it contains a separator ntfy would split on.
    pub fn header_value(&self) -> String {
        if self.url.contains([',', ';']) {
            format!("view, {}, \"{}\"", self.label, self.url)
        } else {
            format!("view, {}, {}", self.label, self.url)
        }
    }
}

/// Result of a successful send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationResult {
    /// HTTP status code returned by the relay
    pub status_code: u16,
    /// Time taken for the request in milliseconds
    pub duration_ms: u64,
}

/// Trait for notification providers
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync so one instance can serve concurrent
/// notifications.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Sends a notification message
    ///
    /// Exactly one request is attempted. Any response outside the accepted
    /// status codes, and any transport failure, is returned as an error.
    async fn send(&self, message: &OutboundMessage) -> AppResult<NotificationResult>;

    /// Returns the provider name for logging/debugging
    fn name(&self) -> &'static str;
}
