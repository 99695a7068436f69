use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Default timeout for one outbound notification request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Outbound POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response to an outbound request; the body is drained and discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
}

/// Abstraction over the HTTP client so delivery can be tested without a network
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request with a plain text body
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse>;
}

/// Production HTTP client using reqwest
///
/// # Features
/// - **Connection pooling**: Reuses TCP connections across notifications
/// - **Timeouts**: configurable request timeout, 10s connect timeout
/// - **Security**: Uses Rustls for TLS (no OpenSSL dependency)
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            // Timeouts
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            // Connection pooling
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            // Security
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::new(e).context("Failed to build HTTP client"),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        tracing::debug!("POST {}", request.url);

        let mut builder = self.client.post(&request.url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| AppError::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        // The body carries nothing we act on, read it so the connection can be reused
        let drained = response.bytes().await.map(|body| body.len()).unwrap_or(0);

        tracing::debug!("POST {} -> {} ({} bytes)", request.url, status, drained);
        Ok(HttpResponse { status })
    }
}
