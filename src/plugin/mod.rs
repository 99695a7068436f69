//! Plugin surface exposed to the Icinga Notifications daemon.
//!
//! The daemon discovers three capabilities: `describe` (`GetInfo`),
//! `configure` (`SetConfig`) and `notify` (`SendNotification`). `rpc` speaks
//! the daemon's wire protocol and forwards each call to a [`Plugin`].

pub mod info;
pub mod rpc;

pub use info::{ConfigOption, OptionType, PluginInfo, plugin_info};
pub use rpc::{PluginServer, RpcRequest, RpcResponse};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ConfigLoader;
use crate::error::{AppError, AppResult};
use crate::external::client::HttpClient;
use crate::models::NotificationRequest;
use crate::services::{Delivery, NotificationService};

/// Capabilities a channel plugin offers to the daemon
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name, version and configuration schema
    fn describe(&self) -> PluginInfo;

    /// Validate and apply a configuration
    ///
    /// A rejected configuration leaves the plugin unconfigured.
    fn configure(&mut self, raw: &Value) -> AppResult<()>;

    /// Deliver one notification
    async fn notify(&self, request: &NotificationRequest) -> AppResult<Delivery>;
}

/// The ntfy channel plugin
pub struct NtfyPlugin {
    loader: ConfigLoader,
    http: Arc<dyn HttpClient>,
    service: Option<NotificationService>,
}

impl NtfyPlugin {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            loader: ConfigLoader::new(),
            http,
            service: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }
}

#[async_trait]
impl Plugin for NtfyPlugin {
    fn describe(&self) -> PluginInfo {
        plugin_info()
    }

    fn configure(&mut self, raw: &Value) -> AppResult<()> {
        self.service = None;

        let config = self.loader.load(raw).inspect_err(|e| {
            tracing::error!("Rejected configuration: {}", e);
        })?;

        tracing::info!(
            ntfy_server = %config.ntfy_server,
            auth = config.credentials.kind(),
            accepted = ?config.response_status_codes,
            "Configuration applied"
        );

        self.service = Some(NotificationService::new(
            Arc::new(config),
            Arc::clone(&self.http),
        ));
        Ok(())
    }

    async fn notify(&self, request: &NotificationRequest) -> AppResult<Delivery> {
        let service = self.service.as_ref().ok_or(AppError::NotConfigured)?;
        service.deliver(request).await
    }
}
