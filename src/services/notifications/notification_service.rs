//! Notification service: maps a request and hands the message to the provider.

use super::mapper::EventMapper;
use super::ntfy_provider::NtfyProvider;
use super::provider::{NotificationProvider, NotificationResult};
use crate::config::NtfyConfig;
use crate::error::AppResult;
use crate::external::client::HttpClient;
use crate::models::{EventType, NotificationRequest};
use std::sync::Arc;

/// Outcome of handling one notification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The relay accepted the message
    Sent(NotificationResult),
    /// The event type is not configured to notify; nothing was sent
    Skipped { event_type: EventType },
}

/// Delivers notification requests through one provider
///
/// Holds only immutable state, so a single instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct NotificationService {
    mapper: EventMapper,
    provider: Arc<dyn NotificationProvider>,
}

impl NotificationService {
    /// Creates a service that publishes to ntfy over `http`
    pub fn new(config: Arc<NtfyConfig>, http: Arc<dyn HttpClient>) -> Self {
        let provider = NtfyProvider::new(Arc::clone(&config), http);
        Self::with_provider(EventMapper::new(config), Arc::new(provider))
    }

    pub fn with_provider(mapper: EventMapper, provider: Arc<dyn NotificationProvider>) -> Self {
        Self { mapper, provider }
    }

    /// Map and send one notification
    ///
    /// Either exactly one request is issued or none is: mapping failures
    /// return before the provider is called.
    #[tracing::instrument(
        name = "deliver",
        skip_all,
        fields(
            contact = %request.contact.full_name,
            object = %request.object.name,
            event = %request.event.kind,
        )
    )]
    pub async fn deliver(&self, request: &NotificationRequest) -> AppResult<Delivery> {
        let message = match self.mapper.map(request) {
            Ok(message) => message,
            Err(e) if e.is_skip() => {
                tracing::info!("Skipping notification: {}", e);
                return Ok(Delivery::Skipped {
                    event_type: request.event.kind.clone(),
                });
            }
            Err(e) => {
                tracing::warn!("Cannot build notification: {}", e);
                return Err(e);
            }
        };

        tracing::debug!(
            "Sending {} notification to '{}': title='{}', priority={}",
            self.provider.name(),
            message.address,
            message.title,
            message.priority
        );

        match self.provider.send(&message).await {
            Ok(result) => {
                tracing::info!(
                    "Notification delivered with status {} in {}ms",
                    result.status_code,
                    result.duration_ms
                );
                Ok(Delivery::Sent(result))
            }
            Err(e) => {
                tracing::error!("Notification delivery failed: {}", e);
                Err(e)
            }
        }
    }
}
