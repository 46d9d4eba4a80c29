// ABOUTME: MCP tool identifier constants to eliminate hardcoded tool names
// ABOUTME: Provides the tool name and structured-content field names
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! MCP tool identifier constants

/// Lists workspace connections with their sync status
pub const CHECK_AIRBYTE_STATUS: &str = "check_airbyte_status";

/// Field names in the tool's structured content
pub mod json_fields {
    pub const WORKSPACE_ID: &str = "workspaceId";
    pub const COUNT: &str = "count";
    pub const CONNECTIONS: &str = "connections";
    pub const TRUNCATED: &str = "truncated";
}
