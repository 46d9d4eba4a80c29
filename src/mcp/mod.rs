// ABOUTME: Model Context Protocol (MCP) implementation for AI assistant integration
// ABOUTME: Stdio JSON-RPC server exposing the Airbyte connection status tool
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Request validation and routing
pub mod mcp_request_processor;
/// Protocol-level handlers
pub mod protocol;
/// Shared server resources
pub mod resources;
/// MCP message schemas
pub mod schema;
/// Tool execution
pub mod tool_handlers;
/// Stdio transport
pub mod transport_manager;
