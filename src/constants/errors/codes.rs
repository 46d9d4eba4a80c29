// ABOUTME: Error code constants for JSON-RPC and MCP protocol errors
// ABOUTME: Defines standard error codes and corresponding error messages
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Error codes for JSON-RPC and MCP protocols

/// Invalid JSON was received
pub const ERROR_PARSE: i32 = -32700;

/// The JSON sent is not a valid request object
pub const ERROR_INVALID_REQUEST: i32 = -32600;

/// Method not found
pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;

/// Invalid parameters
pub const ERROR_INVALID_PARAMS: i32 = -32602;

/// Internal error
pub const ERROR_INTERNAL_ERROR: i32 = -32603;

/// Common error messages
pub const MSG_PARSE_ERROR: &str = "Parse error";
pub const MSG_INTERNAL_ERROR: &str = "Internal error";
