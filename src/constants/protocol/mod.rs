// ABOUTME: Protocol-related constants for MCP and JSON-RPC communication
// ABOUTME: Handles protocol versioning and server identification
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Protocol constants module

/// Protocol version and identification constants
pub mod constants;

pub use constants::*;
