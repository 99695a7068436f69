//! Notification delivery.
//!
//! `EventMapper` turns a notification request into an `OutboundMessage`,
//! a `NotificationProvider` (here ntfy) publishes it, and
//! `NotificationService` ties the two together.

mod mapper;
mod ntfy_provider;
mod provider;

pub mod notification_service;

pub use mapper::{EventMapper, SeverityFormat, format_severity, resolve_address};
pub use notification_service::{Delivery, NotificationService};
pub use ntfy_provider::NtfyProvider;
pub use provider::{NotificationProvider, NotificationResult, OutboundMessage, ViewAction};
