//! Line-delimited JSON-RPC spoken between the notification daemon and a
//! channel plugin.
//!
//! Each request is one JSON object on its own line of stdin, each response
//! one JSON object on its own line of stdout. Requests are handled strictly
//! in order and every request gets exactly one response carrying its `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::Plugin;
use crate::error::{AppError, AppResult};
use crate::models::NotificationRequest;

pub const METHOD_GET_INFO: &str = "GetInfo";
pub const METHOD_SET_CONFIG: &str = "SetConfig";
pub const METHOD_SEND_NOTIFICATION: &str = "SendNotification";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub id: u64,
}

impl RpcResponse {
    fn from_result(id: u64, result: AppResult<Option<Value>>) -> Self {
        match result {
            Ok(result) => Self {
                result,
                error: None,
                id,
            },
            Err(e) => Self {
                result: None,
                error: Some(e.to_string()),
                id,
            },
        }
    }
}

/// Serves one [`Plugin`] over the daemon protocol
pub struct PluginServer<P> {
    plugin: P,
}

impl<P: Plugin> PluginServer<P> {
    pub fn new(plugin: P) -> Self {
        Self { plugin }
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Dispatch a single decoded request
    pub async fn handle(&mut self, request: RpcRequest) -> RpcResponse {
        tracing::debug!(id = request.id, method = %request.method, "Handling request");

        let result = match request.method.as_str() {
            METHOD_GET_INFO => serde_json::to_value(self.plugin.describe())
                .map(Some)
                .map_err(AppError::from),
            METHOD_SET_CONFIG => self.plugin.configure(&request.params).map(|()| None),
            METHOD_SEND_NOTIFICATION => self.send_notification(request.params).await,
            other => Err(AppError::Protocol {
                message: format!("unknown method {:?}", other),
            }),
        };

        if let Err(e) = &result {
            tracing::warn!(id = request.id, method = %request.method, "Request failed: {}", e);
        }
        RpcResponse::from_result(request.id, result)
    }

    async fn send_notification(&self, params: Value) -> AppResult<Option<Value>> {
        let request: NotificationRequest = serde_json::from_value(params)?;
        self.plugin.notify(&request).await?;
        Ok(None)
    }

    /// Decode one line and dispatch it
    ///
    /// Undecodable input still gets a response, addressed to the `id` if one
    /// can be recovered and to `0` otherwise.
    pub async fn handle_line(&mut self, line: &str) -> RpcResponse {
        match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                let id = serde_json::from_str::<Value>(line)
                    .ok()
                    .and_then(|value| value.get("id")?.as_u64())
                    .unwrap_or(0);
                tracing::warn!(id, "Undecodable request: {}", e);
                RpcResponse::from_result(
                    id,
                    Err(AppError::Protocol {
                        message: format!("cannot decode request: {}", e),
                    }),
                )
            }
        }
    }

    /// Answer requests from `reader` on `writer` until end of input
    ///
    /// A line that is not valid UTF-8 is answered with a protocol error for
    /// id `0`; only end of input or a failing writer stops the loop.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut handled = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.handle_line(line).await
                }
                Err(e) => {
                    tracing::warn!("Request is not valid UTF-8: {}", e);
                    RpcResponse::from_result(
                        0,
                        Err(AppError::Protocol {
                            message: format!("request is not valid UTF-8: {}", e),
                        }),
                    )
                }
            };

            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
            handled += 1;
        }

        tracing::info!("Input closed after {} requests", handled);
        Ok(())
    }
}
