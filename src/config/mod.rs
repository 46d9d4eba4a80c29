// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and credential types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration module for the Airbyte MCP server

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AirbyteAuth, AirbyteConfig, AuthMode, ConfigError, ConfigResult, SecretString, ServerConfig,
};
