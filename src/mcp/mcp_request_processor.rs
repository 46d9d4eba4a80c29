// ABOUTME: MCP request processing and protocol routing
// ABOUTME: Validates JSON-RPC envelopes, routes methods, and swallows notifications
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{protocol::ProtocolHandler, resources::ServerResources, tool_handlers::ToolHandlers};
use crate::constants::protocol::{JSONRPC_VERSION, NOTIFICATION_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Longest params preview written to debug logs
const PARAMS_PREVIEW_CHARS: usize = 100;

/// Processes MCP protocol requests with validation, routing, and execution
pub struct McpRequestProcessor {
    resources: Arc<ServerResources>,
}

impl McpRequestProcessor {
    /// Create a new MCP request processor
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle an MCP request and return a response
    ///
    /// Returns `None` for notifications, which never get a reply.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let start_time = Instant::now();
        Self::log_request(&request);

        if request.method.starts_with(NOTIFICATION_PREFIX) {
            Self::handle_notification(&request);
            Self::log_completion("notification", start_time);
            return None;
        }

        let response = match Self::validate_request(&request) {
            Ok(()) => self.process_request(&request).await,
            Err(e) => {
                warn!(method = %request.method, error = %e, "Rejected invalid MCP request");
                JsonRpcResponse::from_app_error(request.id.clone(), &e)
            }
        };

        Self::log_completion("request", start_time);
        Some(response)
    }

    async fn process_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => ProtocolHandler::handle_initialize(request, &self.resources.config),
            "ping" => ProtocolHandler::handle_ping(request),
            "tools/list" => ProtocolHandler::handle_tools_list(request),
            "tools/call" => ToolHandlers::handle_tools_call(request, &self.resources).await,
            "resources/list" => ProtocolHandler::handle_resources_list(request),
            "prompts/list" => ProtocolHandler::handle_prompts_list(request),
            _ => ProtocolHandler::handle_unknown_method(request),
        }
    }

    /// Validate MCP request format and required fields
    fn validate_request(request: &JsonRpcRequest) -> AppResult<()> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(AppError::invalid_request(format!(
                "Invalid JSON-RPC version: got '{}', expected '{}'",
                request.jsonrpc, JSONRPC_VERSION
            )));
        }

        if request.method.is_empty() {
            return Err(AppError::invalid_request("Missing method"));
        }

        Ok(())
    }

    fn handle_notification(request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => debug!("Client finished initialization"),
            "notifications/cancelled" => {
                debug!("Cancellation received; requests run to completion sequentially");
            }
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    fn log_request(request: &JsonRpcRequest) {
        let params_preview = request.params.as_ref().map(|params| {
            let rendered = params.to_string();
            if rendered.chars().count() > PARAMS_PREVIEW_CHARS {
                let head: String = rendered.chars().take(PARAMS_PREVIEW_CHARS).collect();
                format!("{head}...[truncated]")
            } else {
                rendered
            }
        });

        debug!(
            mcp_method = %request.method,
            mcp_id = ?request.id,
            mcp_params_preview = ?params_preview,
            "Received MCP request"
        );
    }

    fn log_completion(request_type: &str, start_time: Instant) {
        debug!(
            duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Completed MCP {} processing", request_type
        );
    }
}
