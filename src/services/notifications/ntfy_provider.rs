//! ntfy notification provider implementation.
//!
//! Publishes a message to a topic with a single HTTP POST. Message metadata
//! travels in headers, the body is the message text.
//!
//! ntfy API Reference: https://docs.ntfy.sh/publish/

use super::provider::{NotificationProvider, NotificationResult, OutboundMessage};
use crate::config::{Credentials, NtfyConfig};
use crate::error::{AppError, AppResult};
use crate::external::client::{HttpClient, HttpRequest};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use std::time::Instant;

/// ntfy notification provider
///
/// # Example
/// ```ignore
/// let http = Arc::new(ReqwestHttpClient::new(DEFAULT_REQUEST_TIMEOUT)?);
/// let provider = NtfyProvider::new(Arc::new(config), http);
/// let result = provider.send(&message).await?;
/// ```
#[derive(Clone)]
pub struct NtfyProvider {
    config: Arc<NtfyConfig>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for NtfyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NtfyProvider")
            .field("ntfy_server", &self.config.ntfy_server)
            .finish()
    }
}

impl NtfyProvider {
    pub fn new(config: Arc<NtfyConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    /// Value of the `Authorization` header, if the server needs one
    fn authorization(&self) -> Option<String> {
        match &self.config.credentials {
            Credentials::Anonymous => None,
            Credentials::Basic { username, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", username, password))
            )),
            Credentials::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }

    /// Builds the publish request for a message
    pub fn build_request(&self, message: &OutboundMessage) -> HttpRequest {
        let mut headers = Vec::with_capacity(6);

        if let Some(authorization) = self.authorization() {
            headers.push(("Authorization".to_string(), authorization));
        }
        headers.push(("Title".to_string(), message.title.clone()));
        headers.push(("Priority".to_string(), message.priority.to_string()));
        headers.push(("Tags".to_string(), message.tags.join(",")));
        if let Some(action) = &message.action {
            headers.push(("Action".to_string(), action.header_value()));
        }
        headers.push(("Markdown".to_string(), message.markdown.to_string()));

        HttpRequest {
            url: format!("{}{}", self.config.ntfy_server, message.address),
            headers,
            body: message.body.clone(),
        }
    }
}

#[async_trait]
impl NotificationProvider for NtfyProvider {
    async fn send(&self, message: &OutboundMessage) -> AppResult<NotificationResult> {
        let start = Instant::now();

        let request = self.build_request(message);
        let response = self.http.post(request).await?;

        let duration_ms = start.elapsed().as_millis() as u64;

        if !self.config.accepts_status(response.status) {
            return Err(AppError::UnexpectedStatus {
                code: response.status,
                accepted: self.config.response_status_codes.clone(),
            });
        }

        Ok(NotificationResult {
            status_code: response.status,
            duration_ms,
        })
    }

    fn name(&self) -> &'static str {
        "ntfy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::client::{HttpResponse, MockHttpClient};
    use crate::models::Priority;
    use crate::services::notifications::provider::ViewAction;

    fn message() -> OutboundMessage {
        OutboundMessage {
            address: "alerts".to_string(),
            title: "web1 is DOWN".to_string(),
            body: "```\nPING CRITICAL\n```".to_string(),
            priority: Priority::Urgent,
            tags: vec!["bangbang".to_string()],
            action: Some(ViewAction::new("https://icinga.example.com/host?name=web1")),
            markdown: true,
        }
    }

    fn provider_with(config: NtfyConfig, mock: MockHttpClient) -> NtfyProvider {
        NtfyProvider::new(Arc::new(config), Arc::new(mock))
    }

    fn config_with(credentials: Credentials) -> NtfyConfig {
        NtfyConfig {
            ntfy_server: "https://ntfy.example.com/".to_string(),
            credentials,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_request_headers() {
        let provider = provider_with(config_with(Credentials::Anonymous), MockHttpClient::new());
        let request = provider.build_request(&message());

        assert_eq!(request.url, "https://ntfy.example.com/alerts");
        assert_eq!(request.body, "```\nPING CRITICAL\n```");
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.header("Title"), Some("web1 is DOWN"));
        assert_eq!(request.header("Priority"), Some("urgent"));
        assert_eq!(request.header("Tags"), Some("bangbang"));
        assert_eq!(
            request.header("Action"),
            Some("view, Open Icinga, https://icinga.example.com/host?name=web1")
        );
        assert_eq!(request.header("Markdown"), Some("true"));
    }

    #[test]
    fn test_build_request_without_action() {
        let provider = provider_with(config_with(Credentials::Anonymous), MockHttpClient::new());
        let mut msg = message();
        msg.action = None;
        msg.tags.push("custom".to_string());

        let request = provider.build_request(&msg);
        assert_eq!(request.header("Action"), None);
        assert_eq!(request.header("Tags"), Some("bangbang,custom"));
    }

    #[test]
    fn test_basic_authorization() {
        let provider = provider_with(
            config_with(Credentials::Basic {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }),
            MockHttpClient::new(),
        );

        let request = provider.build_request(&message());
        // base64("alice:secret")
        assert_eq!(request.header("Authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
    }

    #[test]
    fn test_bearer_authorization() {
        let provider = provider_with(
            config_with(Credentials::Bearer {
                token: "tk_abc".to_string(),
            }),
            MockHttpClient::new(),
        );

        let request = provider.build_request(&message());
        assert_eq!(request.header("Authorization"), Some("Bearer tk_abc"));
    }

    #[tokio::test]
    async fn test_send_accepted_status() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .withf(|request| {
                request.url == "https://ntfy.example.com/alerts"
                    && request.header("Priority") == Some("urgent")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse { status: 200 }));

        let provider = provider_with(config_with(Credentials::Anonymous), mock);
        let result = provider.send(&message()).await.unwrap();
        assert_eq!(result.status_code, 200);
    }

    #[tokio::test]
    async fn test_send_unaccepted_status() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .times(1)
            .returning(|_| Ok(HttpResponse { status: 500 }));

        let provider = provider_with(config_with(Credentials::Anonymous), mock);
        let err = provider.send(&message()).await.unwrap_err();
        match err {
            AppError::UnexpectedStatus { code, accepted } => {
                assert_eq!(code, 500);
                assert_eq!(accepted, vec![200]);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_respects_configured_codes() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .times(1)
            .returning(|_| Ok(HttpResponse { status: 418 }));

        let mut config = config_with(Credentials::Anonymous);
        config.response_status_codes = vec![200, 201, 418];
        let provider = provider_with(config, mock);

        assert_eq!(provider.send(&message()).await.unwrap().status_code, 418);
    }

    #[tokio::test]
    async fn test_send_transport_error_is_passed_through() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().times(1).returning(|request| {
            Err(AppError::Transport {
                url: request.url,
                message: "connection refused".to_string(),
            })
        });

        let provider = provider_with(config_with(Credentials::Anonymous), mock);
        let err = provider.send(&message()).await.unwrap_err();
        assert!(matches!(err, AppError::Transport { ref message, .. } if message == "connection refused"));
    }

    #[test]
    fn test_provider_name() {
        let provider = provider_with(NtfyConfig::default(), MockHttpClient::new());
        assert_eq!(provider.name(), "ntfy");
    }
}
