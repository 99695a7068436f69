//! Drives the plugin protocol end to end with in-memory buffers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ntfy_channel::error::{AppError, AppResult};
use ntfy_channel::external::{HttpClient, HttpRequest, HttpResponse};
use ntfy_channel::plugin::{NtfyPlugin, PluginServer, RpcResponse};
use serde_json::{Value, json};

/// Records every request and answers with a fixed status
struct RecordingClient {
    status: u16,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingClient {
    fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse {
            status: self.status,
        })
    }
}

/// Fails every request the way an unreachable server would
struct UnreachableClient;

#[async_trait]
impl HttpClient for UnreachableClient {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        Err(AppError::Transport {
            url: request.url,
            message: "connection refused".to_string(),
        })
    }
}

async fn run(http: Arc<dyn HttpClient>, lines: &[Value]) -> Vec<RpcResponse> {
    let input: String = lines.iter().map(|line| format!("{}\n", line)).collect();
    let mut output = Vec::new();

    let mut server = PluginServer::new(NtfyPlugin::new(http));
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn notification(id: u64, event_type: &str, severity: &str, service: &str) -> Value {
    json!({
        "method": "SendNotification",
        "id": id,
        "params": {
            "contact": {
                "full_name": "Jane Doe",
                "addresses": [
                    { "type": "email", "address": "jane@example.com" },
                    { "type": "ntfy", "address": "icinga-alerts" }
                ]
            },
            "object": {
                "name": "web1",
                "url": "http://localhost/icingaweb2/icingadb/host?name=web1",
                "tags": { "host": "web1", "service": service },
                "extra_tags": {}
            },
            "incident": {
                "id": 42,
                "url": "http://localhost/icingaweb2/notifications/incident?id=42",
                "severity": severity
            },
            "event": {
                "time": "2024-05-01T12:00:00Z",
                "type": event_type,
                "username": "",
                "message": "PING CRITICAL - Packet loss = 100%"
            }
        }
    })
}

#[tokio::test]
async fn critical_host_state_is_published() {
    let http = RecordingClient::new(200);
    let responses = run(
        http.clone(),
        &[
            json!({ "method": "SetConfig", "id": 1, "params": {
                "ntfy_server": "https://ntfy.example.com",
                "username": "icinga",
                "password": "secret",
                "icinga_server_url": "https://icinga.example.com"
            }}),
            notification(2, "state", "crit", ""),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(|r| r.error.is_none()), "{responses:?}");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.url, "https://ntfy.example.com/icinga-alerts");
    assert_eq!(request.header("Title"), Some("web1 is DOWN"));
    assert_eq!(request.header("Priority"), Some("urgent"));
    assert_eq!(request.header("Tags"), Some("bangbang"));
    assert_eq!(request.header("Markdown"), Some("true"));
    assert_eq!(
        request.header("Action"),
        Some("view, Open Icinga, https://icinga.example.com/icingaweb2/icingadb/host?name=web1")
    );
    assert!(request.header("Authorization").unwrap().starts_with("Basic "));
    assert_eq!(request.body, "```\nPING CRITICAL - Packet loss = 100%\n```");
}

#[tokio::test]
async fn skipped_events_send_nothing() {
    let http = RecordingClient::new(200);
    let responses = run(
        http.clone(),
        &[
            json!({ "method": "SetConfig", "id": 1, "params": {} }),
            notification(2, "acknowledgement-set", "crit", "ping"),
            notification(3, "flapping-start", "warning", "ping"),
        ],
    )
    .await;

    assert!(responses.iter().all(|r| r.error.is_none()));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn per_event_priority_overrides_route_events() {
    let http = RecordingClient::new(200);
    let responses = run(
        http.clone(),
        &[
            json!({ "method": "SetConfig", "id": 1, "params": {
                "priority_low_events": ["acknowledgement-set"],
                "priority_max_events": "custom"
            }}),
            notification(2, "acknowledgement-set", "warning", "disk"),
            notification(3, "custom", "ok", "disk"),
        ],
    )
    .await;

    assert!(responses.iter().all(|r| r.error.is_none()), "{responses:?}");

    let requests = http.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("Priority"), Some("low"));
    assert_eq!(requests[1].header("Priority"), Some("urgent"));
    assert_eq!(requests[1].header("Title"), Some("disk on web1 is OK"));
}

#[tokio::test]
async fn unaccepted_status_is_reported() {
    let http = RecordingClient::new(500);
    let responses = run(
        http.clone(),
        &[
            json!({ "method": "SetConfig", "id": 1, "params": { "response_status_codes": "200, 201" } }),
            notification(2, "state", "warning", "disk"),
        ],
    )
    .await;

    assert_eq!(http.requests().len(), 1);
    assert_eq!(responses[1].id, 2);
    let error = responses[1].error.as_deref().unwrap();
    assert!(error.contains("500"), "{error}");
}

#[tokio::test]
async fn transport_failure_is_reported() {
    let responses = run(
        Arc::new(UnreachableClient),
        &[
            json!({ "method": "SetConfig", "id": 1, "params": {} }),
            notification(2, "state", "crit", ""),
        ],
    )
    .await;

    let error = responses[1].error.as_deref().unwrap();
    assert!(error.contains("https://ntfy.sh/icinga-alerts"), "{error}");
    assert!(error.contains("connection refused"), "{error}");
}

#[tokio::test]
async fn rejected_config_blocks_notifications() {
    let http = RecordingClient::new(200);
    let responses = run(
        http.clone(),
        &[
            json!({ "method": "SetConfig", "id": 1, "params": {} }),
            json!({ "method": "SetConfig", "id": 2, "params": { "username": "a", "access_token": "t", "password": "b" } }),
            notification(3, "state", "crit", ""),
        ],
    )
    .await;

    assert!(responses[0].error.is_none());
    assert!(responses[1].error.is_some());
    assert_eq!(responses[2].error.as_deref(), Some("Plugin is not configured"));
    assert!(http.requests().is_empty());
}
