// ABOUTME: Centralized resource container for dependency injection in the MCP server
// ABOUTME: Holds the immutable startup configuration and the connection status provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server Resources Module
//!
//! Everything a request handler may touch, built once at startup and shared
//! read-only through an `Arc`.

use crate::airbyte::{AirbyteClient, AirbyteResult, ConnectionStatusProvider};
use crate::config::environment::ServerConfig;
use std::fmt;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Configuration loaded at startup
    pub config: Arc<ServerConfig>,
    /// Source of connection statuses for the tool
    pub status_provider: Arc<dyn ConnectionStatusProvider>,
}

impl ServerResources {
    /// Wire the production Airbyte client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ServerConfig) -> AirbyteResult<Self> {
        let client = AirbyteClient::new(config.airbyte.clone())?;
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    /// Use a caller-supplied status provider
    #[must_use]
    pub fn with_provider(
        config: ServerConfig,
        status_provider: Arc<dyn ConnectionStatusProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            status_provider,
        }
    }

    /// Workspace reported by the status tool
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.config.airbyte.workspace_id
    }
}

impl fmt::Debug for ServerResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerResources")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
