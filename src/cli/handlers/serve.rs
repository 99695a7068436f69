//! Serve command handler
//!
//! Runs the plugin protocol until the daemon closes stdin.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use crate::error::AppResult;
use crate::external::client::ReqwestHttpClient;
use crate::plugin::{NtfyPlugin, PluginServer};

/// Handler for the serve command
pub struct ServeCommandHandler {
    timeout: Duration,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Serve the daemon on stdin/stdout
    pub async fn execute(&self) -> AppResult<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout()).await
    }

    /// Serve requests from `reader`, answering on `writer`
    pub async fn run<R, W>(&self, reader: R, writer: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let http = Arc::new(ReqwestHttpClient::new(self.timeout)?);
        let mut server = PluginServer::new(NtfyPlugin::new(http));

        tracing::info!(
            version = crate::pkg_version(),
            timeout_secs = self.timeout.as_secs(),
            "Channel plugin started"
        );
        server.serve(reader, writer).await?;
        Ok(())
    }
}
