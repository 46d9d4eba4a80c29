// ABOUTME: MCP protocol schema definitions and message structures
// ABOUTME: Initialize response, tool schema, and tool result types serialized to the client
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! MCP Protocol Schema Definitions
//!
//! Type-safe definitions for the MCP messages this server produces, so tool
//! metadata and results are never assembled from ad-hoc JSON.

use crate::constants::tools::CHECK_AIRBYTE_STATUS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Server Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// MCP Tool Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,
}

/// JSON Schema Property Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `tools/call` parameters
///
/// `arguments` is kept as raw JSON; tools that take none ignore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Tool Response after execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResponse {
    /// Successful result with a text summary and structured payload
    #[must_use]
    pub fn success(text: impl Into<String>, structured_content: Value) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
            structured_content: Some(structured_content),
        }
    }

    /// Failed result carrying a message for the agent
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text {
                text: message.into(),
            }],
            is_error: true,
            structured_content: None,
        }
    }

    /// Text of the first content block, if any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|content| match content {
            Content::Text { text } => Some(text.as_str()),
        })
    }
}

/// Content types for MCP messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// MCP Server Capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Initialize Request from client (only the fields we act on)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitializeRequest {
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo", default)]
    pub client_info: Option<ClientInfo>,
}

/// Client Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Complete MCP Initialize Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    pub capabilities: ServerCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResponse {
    /// Create a new initialize response with current server configuration
    #[must_use]
    pub fn new(protocol_version: String, server_name: String, server_version: String) -> Self {
        Self {
            protocol_version,
            server_info: ServerInfo {
                name: server_name,
                version: server_version,
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            instructions: Some(format!(
                "This server reports the sync status of Airbyte connections in the configured workspace. Call `{CHECK_AIRBYTE_STATUS}` (no arguments) to list every connection with its status (active, inactive, error or unknown) and last sync time."
            )),
        }
    }
}

/// Get all available tools
#[must_use]
pub fn get_tools() -> Vec<ToolSchema> {
    vec![create_check_airbyte_status_tool()]
}

/// Create the `check_airbyte_status` tool schema
fn create_check_airbyte_status_tool() -> ToolSchema {
    ToolSchema {
        name: CHECK_AIRBYTE_STATUS.to_owned(),
        description: "Check the status of all Airbyte connections in the configured workspace. Returns each connection's id, name, normalized status and last sync time.".into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: HashMap::new(),
            required: Vec::new(),
        },
    }
}
