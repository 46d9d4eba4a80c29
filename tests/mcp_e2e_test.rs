// ABOUTME: End-to-end tests driving the stdio transport with newline-delimited JSON-RPC frames
// ABOUTME: Exercises a full MCP session against a mocked Airbyte API through in-memory pipes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use airbyte_mcp_server::mcp::transport_manager::StdioTransport;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use wiremock::MockServer;

mod common;

use common::{
    api_connection, api_key_config, http_resources, mount_connections, mount_empty_jobs,
    provider_resources, StaticProvider,
};

/// Feed `input` through the transport and parse every output frame
async fn run_session(transport: &StdioTransport, input: &str) -> Vec<Value> {
    run_raw_session(transport, input.as_bytes()).await
}

/// Same as [`run_session`] for input that need not be UTF-8
async fn run_raw_session(transport: &StdioTransport, input: &[u8]) -> Vec<Value> {
    let mut output = Vec::new();
    transport.serve(input, &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn empty_transport() -> StdioTransport {
    StdioTransport::new(provider_resources(Arc::new(StaticProvider::new(Ok(
        vec![],
    )))))
}

#[tokio::test]
async fn test_full_session_over_duplex_pipe() {
    let server = MockServer::start().await;
    mount_connections(
        &server,
        &[
            api_connection("a", "Postgres to Snowflake", "active"),
            api_connection("b", "Stripe to BigQuery", "failed"),
        ],
    )
    .await;
    mount_empty_jobs(&server).await;

    let transport = StdioTransport::new(http_resources(api_key_config(&server.uri())));

    let (client, server_side) = io::duplex(64 * 1024);
    let (server_read, server_write) = io::split(server_side);
    let (client_read, mut client_write) = io::split(client);

    let serve = transport.serve(BufReader::new(server_read), server_write);

    let client_session = async move {
        let mut responses = BufReader::new(client_read).lines();
        let exchange = |frame: Value| {
            let mut line = frame.to_string();
            line.push('\n');
            line
        };

        client_write
            .write_all(
                exchange(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "initialize",
                    "params": {
                        "protocolVersion": "2025-03-26",
                        "capabilities": {},
                        "clientInfo": { "name": "test-agent", "version": "1.0" }
                    }
                }))
                .as_bytes(),
            )
            .await
            .unwrap();
        let initialize: Value =
            serde_json::from_str(&responses.next_line().await.unwrap().unwrap()).unwrap();

        // Notifications produce no frame; the next line read belongs to tools/list
        client_write
            .write_all(
                exchange(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
                    .as_bytes(),
            )
            .await
            .unwrap();
        client_write
            .write_all(exchange(json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" })).as_bytes())
            .await
            .unwrap();
        let tools: Value =
            serde_json::from_str(&responses.next_line().await.unwrap().unwrap()).unwrap();

        client_write
            .write_all(
                exchange(json!({
                    "jsonrpc": "2.0",
                    "id": "call-3",
                    "method": "tools/call",
                    "params": { "name": "check_airbyte_status", "arguments": {} }
                }))
                .as_bytes(),
            )
            .await
            .unwrap();
        let call: Value =
            serde_json::from_str(&responses.next_line().await.unwrap().unwrap()).unwrap();

        client_write.shutdown().await.unwrap();
        (initialize, tools, call)
    };

    let (served, (initialize, tools, call)) = tokio::join!(serve, client_session);
    served.unwrap();

    assert_eq!(initialize["id"], 1);
    assert_eq!(initialize["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(initialize["result"]["serverInfo"]["name"], "airbyte-mcp-server");
    assert!(initialize["result"]["capabilities"]["tools"].is_object());

    assert_eq!(tools["id"], 2);
    assert_eq!(tools["result"]["tools"][0]["name"], "check_airbyte_status");

    assert_eq!(call["id"], "call-3");
    let result = &call["result"];
    assert_eq!(result["isError"], false);
    assert_eq!(result["structuredContent"]["workspaceId"], common::WORKSPACE_ID);
    assert_eq!(result["structuredContent"]["count"], 2);

    let connections = result["structuredContent"]["connections"].as_array().unwrap();
    let statuses: Vec<(&str, &str)> = connections
        .iter()
        .map(|c| {
            (
                c["connectionId"].as_str().unwrap(),
                c["status"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(statuses, vec![("a", "active"), ("b", "error")]);
    assert!(connections[0]["lastSyncAt"].is_null());

    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Postgres to Snowflake"));
    assert!(text.contains("error"));
}

#[tokio::test]
async fn test_parse_error_keeps_serving() {
    let transport = empty_transport();
    let input = concat!(
        "{not json\n",
        "\n",
        "{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n",
    );

    let frames = run_session(&transport, input).await;
    assert_eq!(frames.len(), 2);

    assert_eq!(frames[0]["error"]["code"], -32700);
    assert!(frames[0]["id"].is_null());
    assert!(frames[0].get("result").is_none());

    assert_eq!(frames[1]["id"], 7);
    assert_eq!(frames[1]["result"], json!({}));
}

#[tokio::test]
async fn test_non_utf8_frame_keeps_serving() {
    let transport = empty_transport();
    let mut input = Vec::new();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
    input.extend_from_slice(b"\xff\xfe garbage\n");
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

    let frames = run_raw_session(&transport, &input).await;
    assert_eq!(frames.len(), 3);

    assert_eq!(frames[0]["id"], 1);
    assert_eq!(frames[0]["result"], json!({}));

    assert_eq!(frames[1]["error"]["code"], -32700);
    assert!(frames[1]["id"].is_null());

    assert_eq!(frames[2]["id"], 2);
    assert_eq!(frames[2]["result"], json!({}));
}

#[tokio::test]
async fn test_final_frame_without_newline_is_served() {
    let transport = empty_transport();
    let frames = run_session(&transport, "{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"ping\"}").await;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["id"], 5);
}

#[tokio::test]
async fn test_malformed_messages_are_invalid_requests() {
    let transport = empty_transport();
    let input = concat!(
        "[1,2,3]\n",
        "{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":42}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":10,\"result\":{}}\n",
    );

    let frames = run_session(&transport, input).await;
    assert_eq!(frames.len(), 2, "client responses must not be answered");

    assert_eq!(frames[0]["error"]["code"], -32600);
    assert!(frames[0]["id"].is_null());

    assert_eq!(frames[1]["error"]["code"], -32600);
    assert_eq!(frames[1]["id"], 9);
}

#[tokio::test]
async fn test_responses_follow_request_order() {
    let transport = empty_transport();
    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n",
        "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/cancelled\",\"params\":{\"requestId\":1}}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"check_airbyte_status\"}}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"unknown/method\"}\n",
    );

    let frames = run_session(&transport, input).await;
    let ids: Vec<Value> = frames.iter().map(|frame| frame["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);

    assert_eq!(frames[1]["result"]["isError"], false);
    assert_eq!(
        frames[1]["result"]["content"][0]["text"],
        "No Airbyte connections found in workspace ws-test."
    );
    assert_eq!(frames[2]["error"]["code"], -32601);
}

#[tokio::test]
async fn test_eof_without_input_ends_cleanly() {
    let transport = empty_transport();
    let frames = run_session(&transport, "").await;
    assert!(frames.is_empty());
}
