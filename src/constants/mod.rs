// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Protocol identifiers, error codes, tool names, and Airbyte API defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Constants module
//!
//! Constants are grouped by domain. Values that operators may override are read
//! once by [`crate::config::environment::ServerConfig`]; the defaults live here.

pub mod errors;
pub mod protocol;
pub mod tools;

pub use errors::*;
pub use protocol::*;
pub use tools::*;

/// Environment variable names read at startup
pub mod env_config {
    /// Workspace whose connections are reported (required)
    pub const AIRBYTE_WORKSPACE_ID: &str = "AIRBYTE_WORKSPACE_ID";
    /// OAuth client id for the client-credentials exchange
    pub const AIRBYTE_CLIENT_ID: &str = "AIRBYTE_CLIENT_ID";
    /// OAuth client secret for the client-credentials exchange
    pub const AIRBYTE_CLIENT_SECRET: &str = "AIRBYTE_CLIENT_SECRET";
    /// Static API key; selects the API-key auth path when present
    pub const AIRBYTE_API_KEY: &str = "AIRBYTE_API_KEY";
    /// Override for the Airbyte public API base URL
    pub const AIRBYTE_API_BASE_URL: &str = "AIRBYTE_API_BASE_URL";
    /// Whole-request timeout in seconds
    pub const AIRBYTE_REQUEST_TIMEOUT_SECS: &str = "AIRBYTE_REQUEST_TIMEOUT_SECS";
    /// TCP/TLS connect timeout in seconds
    pub const AIRBYTE_CONNECT_TIMEOUT_SECS: &str = "AIRBYTE_CONNECT_TIMEOUT_SECS";
    /// Page size for the connections listing
    pub const AIRBYTE_PAGE_SIZE: &str = "AIRBYTE_PAGE_SIZE";
    /// MCP protocol version advertised when the client does not pick one
    pub const MCP_PROTOCOL_VERSION: &str = "MCP_PROTOCOL_VERSION";
    /// Server name reported in `initialize`
    pub const SERVER_NAME: &str = "SERVER_NAME";
}

/// Airbyte public API defaults
pub mod airbyte_api {
    /// Production API base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.airbyte.com/v1";
    /// Default whole-request timeout
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Default (and maximum) page size accepted by `/connections`
    pub const DEFAULT_PAGE_SIZE: u32 = 100;
    /// Upper bound accepted by the API for `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
    /// Hard stop when following `next` links
    pub const MAX_PAGES: usize = 50;
    /// Number of recent sync jobs inspected for last-sync timestamps
    pub const RECENT_JOBS_LIMIT: u32 = 100;
    /// Longest API error body echoed back to the agent
    pub const MAX_ERROR_BODY_CHARS: usize = 300;
    /// Token endpoint path relative to the base URL
    pub const TOKEN_PATH: &str = "applications/token";
    /// Connections listing path relative to the base URL
    pub const CONNECTIONS_PATH: &str = "connections";
    /// Jobs listing path relative to the base URL
    pub const JOBS_PATH: &str = "jobs";
    /// `User-Agent` sent on every request
    pub const USER_AGENT: &str = concat!("airbyte-mcp-server/", env!("CARGO_PKG_VERSION"));
}

/// Service names used in structured logs
pub mod service_names {
    /// Default service / server name
    pub const AIRBYTE_MCP_SERVER: &str = "airbyte-mcp-server";
}
