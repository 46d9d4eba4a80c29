// ABOUTME: Main library entry point for the Airbyte MCP server
// ABOUTME: Exposes Airbyte connection sync status to LLM agents as an MCP tool over stdio
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Airbyte MCP Server
//!
//! A Model Context Protocol (MCP) server with a single tool,
//! `check_airbyte_status`, that lists the connections of one Airbyte workspace
//! with a normalized sync status.
//!
//! ## Architecture
//!
//! - **Config**: credentials and API settings, loaded once at startup
//! - **Airbyte**: authentication, connection listing and status normalization
//! - **MCP**: JSON-RPC routing, the tool handler and the stdio transport
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use airbyte_mcp_server::config::environment::ServerConfig;
//! use airbyte_mcp_server::mcp::{resources::ServerResources, transport_manager::StdioTransport};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::new(config)?);
//!     StdioTransport::new(resources).run().await?;
//!     Ok(())
//! }
//! ```

/// Airbyte API client and status normalization
pub mod airbyte;

/// Configuration loaded from the environment
pub mod config;

/// Application constants
pub mod constants;

/// Unified error handling at the protocol boundary
pub mod errors;

/// JSON-RPC 2.0 message types
pub mod jsonrpc;

/// Logging setup
pub mod logging;

/// Model Context Protocol server
pub mod mcp;
