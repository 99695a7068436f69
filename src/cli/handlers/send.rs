//! Send command handler
//!
//! Delivers a single notification request outside of the daemon, using the
//! same validation, mapping and delivery path as the plugin protocol.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigLoader;
use crate::error::AppResult;
use crate::external::client::{HttpClient, ReqwestHttpClient};
use crate::models::NotificationRequest;
use crate::services::{Delivery, NotificationService};

/// Handler for the send command
pub struct SendCommandHandler {
    config: PathBuf,
    request: PathBuf,
    timeout: Duration,
}

impl SendCommandHandler {
    pub fn new(config: PathBuf, request: PathBuf, timeout: Duration) -> Self {
        Self {
            config,
            request,
            timeout,
        }
    }

    /// Deliver the request over HTTP
    pub async fn execute<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let http = Arc::new(ReqwestHttpClient::new(self.timeout)?);
        self.execute_with(http, out).await
    }

    /// Deliver the request through the given client
    pub async fn execute_with<W: Write>(
        &self,
        http: Arc<dyn HttpClient>,
        out: &mut W,
    ) -> AppResult<()> {
        let config = ConfigLoader::new().load_file(&self.config)?;
        let content = std::fs::read_to_string(&self.request)?;
        let request: NotificationRequest = serde_json::from_str(&content)?;

        let service = NotificationService::new(Arc::new(config), http);
        match service.deliver(&request).await? {
            Delivery::Sent(result) => writeln!(
                out,
                "Sent: HTTP {} in {}ms",
                result.status_code, result.duration_ms
            )?,
            Delivery::Skipped { event_type } => writeln!(
                out,
                "Skipped: event type '{}' is not configured to notify",
                event_type
            )?,
        }
        Ok(())
    }
}
