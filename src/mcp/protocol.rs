// ABOUTME: MCP protocol message handlers for core protocol operations
// ABOUTME: Handles initialize, ping, tools/list, empty resource and prompt listings, and unknown methods
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # MCP Protocol Handlers
//!
//! Stateless handlers for the protocol methods that do not touch Airbyte.

use crate::config::environment::ServerConfig;
use crate::constants::errors::{ERROR_INTERNAL_ERROR, MSG_INTERNAL_ERROR};
use crate::constants::protocol::{SERVER_VERSION, SUPPORTED_MCP_PROTOCOL_VERSIONS};
use crate::errors::AppError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::schema::{get_tools, InitializeRequest, InitializeResponse};
use serde_json::json;
use tracing::{debug, info, warn};

/// MCP protocol handlers
pub struct ProtocolHandler;

impl ProtocolHandler {
    /// Handle initialize request
    ///
    /// Echoes the client's protocol version when we support it, otherwise
    /// offers the configured default.
    #[must_use]
    pub fn handle_initialize(request: &JsonRpcRequest, config: &ServerConfig) -> JsonRpcResponse {
        let init_request: InitializeRequest = request
            .params
            .clone()
            .and_then(|params| serde_json::from_value(params).ok())
            .unwrap_or_default();

        let protocol_version =
            negotiate_protocol_version(init_request.protocol_version.as_deref(), config);

        if let Some(client) = &init_request.client_info {
            info!(
                client_name = %client.name,
                client_version = %client.version,
                protocol_version = %protocol_version,
                "MCP client initialized"
            );
        }

        let init_response = InitializeResponse::new(
            protocol_version,
            config.server_name.clone(),
            SERVER_VERSION.to_owned(),
        );

        match serde_json::to_value(&init_response) {
            Ok(result) => JsonRpcResponse::success(request.id.clone(), result),
            Err(e) => {
                warn!(error = %e, "Failed to serialize initialize response");
                JsonRpcResponse::error(request.id.clone(), ERROR_INTERNAL_ERROR, MSG_INTERNAL_ERROR)
            }
        }
    }

    /// Handle ping request
    #[must_use]
    pub fn handle_ping(request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id.clone(), json!({}))
    }

    /// Handle tools list request
    #[must_use]
    pub fn handle_tools_list(request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = get_tools();
        JsonRpcResponse::success(request.id.clone(), json!({ "tools": tools }))
    }

    /// Handle prompts list request
    #[must_use]
    pub fn handle_prompts_list(request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id.clone(), json!({ "prompts": [] }))
    }

    /// Handle resources list request
    #[must_use]
    pub fn handle_resources_list(request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id.clone(), json!({ "resources": [] }))
    }

    /// Handle unknown method request
    #[must_use]
    pub fn handle_unknown_method(request: &JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "Unknown MCP method");
        JsonRpcResponse::from_app_error(
            request.id.clone(),
            &AppError::method_not_found(&request.method),
        )
    }
}

/// Pick the protocol version to answer `initialize` with
#[must_use]
pub fn negotiate_protocol_version(requested: Option<&str>, config: &ServerConfig) -> String {
    match requested {
        Some(version) if SUPPORTED_MCP_PROTOCOL_VERSIONS.contains(&version) => version.to_owned(),
        Some(version) => {
            debug!(
                requested = %version,
                offered = %config.protocol_version,
                "Client requested unsupported protocol version"
            );
            config.protocol_version.clone()
        }
        None => config.protocol_version.clone(),
    }
}
