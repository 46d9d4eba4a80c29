// ABOUTME: MCP protocol constants including version, JSON-RPC, and server identification
// ABOUTME: Defaults are overridable through ServerConfig at startup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Protocol constants for MCP and JSON-RPC

/// MCP protocol version advertised when the client asks for one we don't know
pub const DEFAULT_MCP_PROTOCOL_VERSION: &str = "2025-06-18";

/// Protocol versions this server can speak, newest first
pub const SUPPORTED_MCP_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// JSON-RPC version (standard, not configurable)
pub const JSONRPC_VERSION: &str = "2.0";

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix shared by all client notifications
pub const NOTIFICATION_PREFIX: &str = "notifications/";
