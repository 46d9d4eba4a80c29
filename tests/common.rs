// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, configuration, mock Airbyte API, and in-process status providers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `airbyte_mcp_server`

use airbyte_mcp_server::airbyte::{
    AirbyteResult, ConnectionStatus, ConnectionStatusProvider, ConnectionStatusRecord,
    ConnectionStatusReport,
};
use airbyte_mcp_server::config::environment::{AirbyteConfig, ServerConfig};
use airbyte_mcp_server::jsonrpc::JsonRpcResponse;
use airbyte_mcp_server::mcp::resources::ServerResources;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WORKSPACE_ID: &str = "ws-test";
pub const API_KEY: &str = "test-api-key";
pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// API-key configuration pointed at a mock server
pub fn api_key_config(base_url: &str) -> AirbyteConfig {
    AirbyteConfig::with_api_key(WORKSPACE_ID, API_KEY).base_url(base_url)
}

/// Client-credentials configuration pointed at a mock server
pub fn client_credentials_config(base_url: &str) -> AirbyteConfig {
    AirbyteConfig::with_client_credentials(WORKSPACE_ID, CLIENT_ID, CLIENT_SECRET)
        .base_url(base_url)
}

/// Server resources backed by the real HTTP client
pub fn http_resources(config: AirbyteConfig) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(ServerConfig::new(config)).unwrap())
}

/// Server resources backed by a canned provider
pub fn provider_resources(provider: Arc<dyn ConnectionStatusProvider>) -> Arc<ServerResources> {
    init_test_logging();
    let config = ServerConfig::new(AirbyteConfig::with_api_key(WORKSPACE_ID, API_KEY));
    Arc::new(ServerResources::with_provider(config, provider))
}

/// Body of a connections page
pub fn connections_page(connections: &[Value], next: Option<String>) -> Value {
    let mut page = json!({ "data": connections });
    if let Some(next) = next {
        page["next"] = Value::String(next);
    }
    page
}

/// Connection record as the API returns it
pub fn api_connection(id: &str, name: &str, status: &str) -> Value {
    json!({
        "connectionId": id,
        "name": name,
        "status": status,
        "sourceId": "src-1",
        "destinationId": "dst-1",
        "workspaceId": WORKSPACE_ID
    })
}

/// Mount a single connections page answering any `GET /connections`
pub async fn mount_connections(server: &MockServer, connections: &[Value]) {
    Mock::given(method("GET"))
        .and(path("/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(connections_page(connections, None)))
        .mount(server)
        .await;
}

/// Mount an empty jobs listing
pub async fn mount_empty_jobs(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(server)
        .await;
}

/// Provider returning a fixed outcome and counting calls
pub struct StaticProvider {
    outcome: AirbyteResult<ConnectionStatusReport>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(outcome: AirbyteResult<Vec<ConnectionStatusRecord>>) -> Self {
        Self {
            outcome: outcome.map(ConnectionStatusReport::complete),
            calls: AtomicUsize::new(0),
        }
    }

    /// Listing that stopped at the page limit
    pub fn truncated(records: Vec<ConnectionStatusRecord>) -> Self {
        Self {
            outcome: Ok(ConnectionStatusReport {
                records,
                truncated: true,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionStatusProvider for StaticProvider {
    async fn list_connection_statuses(&self) -> AirbyteResult<ConnectionStatusReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Status record without a sync time
pub fn record(id: &str, name: &str, status: ConnectionStatus) -> ConnectionStatusRecord {
    ConnectionStatusRecord {
        connection_id: id.to_owned(),
        name: name.to_owned(),
        status,
        last_sync_at: None,
    }
}

/// `result` of a successful response
pub fn result_of(response: &JsonRpcResponse) -> &Value {
    assert!(
        response.error.is_none(),
        "unexpected error: {:?}",
        response.error
    );
    response.result.as_ref().unwrap()
}

/// First text block of a tool result
pub fn tool_text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}
