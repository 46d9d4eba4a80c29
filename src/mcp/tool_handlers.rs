// ABOUTME: Tool execution handlers for MCP tools/call requests
// ABOUTME: Runs check_airbyte_status and converts every client outcome into a tool result envelope
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::resources::ServerResources;
use super::schema::{ToolCall, ToolResponse};
use crate::airbyte::{ConnectionStatusRecord, ConnectionStatusReport};
use crate::constants::airbyte_api::MAX_PAGES;
use crate::constants::errors::{ERROR_INTERNAL_ERROR, MSG_INTERNAL_ERROR};
use crate::constants::tools::{json_fields, CHECK_AIRBYTE_STATUS};
use crate::errors::AppError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::field::Empty;
use tracing::{debug, error, info, warn, Span};

/// Tool execution handlers for MCP protocol
pub struct ToolHandlers;

impl ToolHandlers {
    /// Handle a `tools/call` request
    ///
    /// Protocol problems (missing or unknown tool name) become JSON-RPC errors.
    /// Tool failures become results with `isError: true`.
    #[tracing::instrument(
        skip(request, resources),
        fields(
            request_id = ?request.id,
            tool_name = Empty,
            success = Empty,
            duration_ms = Empty,
        )
    )]
    pub async fn handle_tools_call(
        request: &JsonRpcRequest,
        resources: &ServerResources,
    ) -> JsonRpcResponse {
        let tool_call = match parse_tool_call(request.params.as_ref()) {
            Ok(call) => call,
            Err(e) => return JsonRpcResponse::from_app_error(request.id.clone(), &e),
        };
        Span::current().record("tool_name", tool_call.name.as_str());

        if tool_call.arguments.as_ref().is_some_and(has_arguments) {
            debug!(tool = %tool_call.name, "Ignoring arguments passed to a zero-argument tool");
        }

        let start = Instant::now();
        let tool_response = match tool_call.name.as_str() {
            CHECK_AIRBYTE_STATUS => Self::handle_check_airbyte_status(resources).await,
            unknown => {
                return JsonRpcResponse::from_app_error(
                    request.id.clone(),
                    &AppError::invalid_params(format!("Unknown tool: {unknown}")),
                );
            }
        };
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        Span::current()
            .record("success", !tool_response.is_error)
            .record("duration_ms", duration_ms);

        match serde_json::to_value(&tool_response) {
            Ok(result) => JsonRpcResponse::success(request.id.clone(), result),
            Err(e) => {
                error!(error = %e, "Failed to serialize tool response");
                JsonRpcResponse::error(request.id.clone(), ERROR_INTERNAL_ERROR, MSG_INTERNAL_ERROR)
            }
        }
    }

    /// Execute `check_airbyte_status` against the configured provider
    ///
    /// Never fails: every error is folded into a failure envelope.
    pub async fn handle_check_airbyte_status(resources: &ServerResources) -> ToolResponse {
        let start = Instant::now();
        let workspace_id = resources.workspace_id();

        match resources.status_provider.list_connection_statuses().await {
            Ok(report) => {
                info!(
                    tool = CHECK_AIRBYTE_STATUS,
                    success = true,
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    count = report.records.len(),
                    truncated = report.truncated,
                    "Tool call completed"
                );
                build_status_response(workspace_id, &report)
            }
            Err(e) => {
                warn!(
                    tool = CHECK_AIRBYTE_STATUS,
                    success = false,
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    timed_out = e.is_timeout(),
                    error = %e,
                    "Tool call failed"
                );
                ToolResponse::failure(e.user_message())
            }
        }
    }
}

fn parse_tool_call(params: Option<&Value>) -> Result<ToolCall, AppError> {
    let params = params.ok_or_else(|| AppError::invalid_params("Missing parameters for tools/call"))?;
    let call: ToolCall = serde_json::from_value(params.clone())
        .map_err(|e| AppError::invalid_params(format!("Invalid tools/call parameters: {e}")))?;
    if call.name.trim().is_empty() {
        return Err(AppError::invalid_params("Missing tool name"));
    }
    Ok(call)
}

fn has_arguments(arguments: &Value) -> bool {
    match arguments {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Render a report into the success envelope
///
/// Text and structured content list connections in the order given.
#[must_use]
pub fn build_status_response(workspace_id: &str, report: &ConnectionStatusReport) -> ToolResponse {
    let records = &report.records;
    let mut text = render_status_text(workspace_id, records);
    if report.truncated {
        text.push_str(&format!(
            "\nList truncated after {MAX_PAGES} pages: the workspace has more connections than shown."
        ));
    }

    let connections = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>();

    match connections {
        Ok(connections) => {
            let mut structured = Map::new();
            structured.insert(
                json_fields::WORKSPACE_ID.to_owned(),
                Value::String(workspace_id.to_owned()),
            );
            structured.insert(json_fields::COUNT.to_owned(), Value::from(records.len()));
            structured.insert(
                json_fields::CONNECTIONS.to_owned(),
                Value::Array(connections),
            );
            structured.insert(
                json_fields::TRUNCATED.to_owned(),
                Value::Bool(report.truncated),
            );
            ToolResponse::success(text, Value::Object(structured))
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize connection status records");
            ToolResponse::failure(format!("{MSG_INTERNAL_ERROR}: could not encode connection statuses"))
        }
    }
}

/// One line per connection, preceded by a summary line
#[must_use]
pub fn render_status_text(workspace_id: &str, records: &[ConnectionStatusRecord]) -> String {
    if records.is_empty() {
        return format!("No Airbyte connections found in workspace {workspace_id}.");
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!(
        "Found {} Airbyte connection(s) in workspace {workspace_id}:",
        records.len()
    ));
    lines.extend(records.iter().map(render_record_line));
    lines.join("\n")
}

fn render_record_line(record: &ConnectionStatusRecord) -> String {
    let last_sync = record
        .last_sync_at
        .map_or_else(|| "never".to_owned(), |at| at.to_rfc3339());

    if record.name.is_empty() {
        format!(
            "- {}: {} (last sync: {last_sync})",
            record.connection_id, record.status
        )
    } else {
        format!(
            "- {} [{}]: {} (last sync: {last_sync})",
            record.name, record.connection_id, record.status
        )
    }
}
