// ABOUTME: Airbyte API integration: authentication, connection listing, and status normalization
// ABOUTME: Exposes the ConnectionStatusProvider seam used by the MCP tool handler
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Airbyte API client
//!
//! [`AirbyteClient`] is the production [`ConnectionStatusProvider`]. Tests and
//! embedders can substitute their own provider through
//! [`crate::mcp::resources::ServerResources`].

/// Bearer token resolution
pub mod auth;
/// HTTP client
pub mod client;
/// Error taxonomy
pub mod errors;
/// Wire types and status records
pub mod models;

pub use client::AirbyteClient;
pub use errors::{AirbyteError, AirbyteResult};
pub use models::{ConnectionStatus, ConnectionStatusRecord, ConnectionStatusReport};

use async_trait::async_trait;

/// Source of connection status records for one workspace
#[async_trait]
pub trait ConnectionStatusProvider: Send + Sync {
    /// Fetch the current status of every connection, in API order
    ///
    /// The report is flagged as truncated when the listing hit the page limit.
    ///
    /// # Errors
    ///
    /// Returns an [`AirbyteError`] describing why the statuses could not be read.
    async fn list_connection_statuses(&self) -> AirbyteResult<ConnectionStatusReport>;
}
