// ABOUTME: Environment configuration management for Airbyte credentials and server settings
// ABOUTME: Loads and validates configuration once at startup, redacting secrets everywhere
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration
//!
//! [`ServerConfig`] is built once when the process starts and handed to the
//! Airbyte client by reference. Request handling never consults the process
//! environment.

use crate::constants::{airbyte_api, env_config, protocol, service_names};
use serde::Serialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;
use zeroize::Zeroizing;

/// Configuration problems detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("Missing required environment variable {name}")]
    MissingVariable {
        /// Variable name
        name: &'static str,
    },

    /// A variable is set but unusable
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A credential that is wiped on drop and never printed
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    /// Wrap a secret value
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the raw value, only for putting it on the wire
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Which authentication path the client takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Static bearer API key
    ApiKey,
    /// OAuth client-credentials token exchange
    ClientCredentials,
}

impl AuthMode {
    /// Environment variables an operator should check when auth fails
    #[must_use]
    pub const fn credential_hint(self) -> &'static str {
        match self {
            Self::ApiKey => "AIRBYTE_API_KEY",
            Self::ClientCredentials => "AIRBYTE_CLIENT_ID/AIRBYTE_CLIENT_SECRET",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => write!(f, "api_key"),
            Self::ClientCredentials => write!(f, "client_credentials"),
        }
    }
}

/// Credentials used against the Airbyte API; the two paths are exclusive
#[derive(Debug, Clone)]
pub enum AirbyteAuth {
    /// `AIRBYTE_API_KEY` was set
    ApiKey {
        /// The static key sent as a bearer token
        api_key: SecretString,
    },
    /// Exchange client id/secret for a bearer token on every call
    ClientCredentials {
        /// OAuth client id
        client_id: String,
        /// OAuth client secret
        client_secret: SecretString,
    },
}

impl AirbyteAuth {
    /// The auth path this credential selects
    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        match self {
            Self::ApiKey { .. } => AuthMode::ApiKey,
            Self::ClientCredentials { .. } => AuthMode::ClientCredentials,
        }
    }
}

/// Everything needed to talk to the Airbyte public API
#[derive(Debug, Clone)]
pub struct AirbyteConfig {
    /// Workspace whose connections are reported
    pub workspace_id: String,
    /// Selected credentials
    pub auth: AirbyteAuth,
    /// API base URL without trailing slash
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// `limit` sent to the connections listing
    pub page_size: u32,
}

impl AirbyteConfig {
    /// Build an API-key configuration with production defaults
    #[must_use]
    pub fn with_api_key(workspace_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_auth(
            workspace_id,
            AirbyteAuth::ApiKey {
                api_key: SecretString::new(api_key),
            },
        )
    }

    /// Build a client-credentials configuration with production defaults
    #[must_use]
    pub fn with_client_credentials(
        workspace_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::with_auth(
            workspace_id,
            AirbyteAuth::ClientCredentials {
                client_id: client_id.into(),
                client_secret: SecretString::new(client_secret),
            },
        )
    }

    fn with_auth(workspace_id: impl Into<String>, auth: AirbyteAuth) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            auth,
            base_url: airbyte_api::DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(airbyte_api::DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(airbyte_api::DEFAULT_CONNECT_TIMEOUT_SECS),
            page_size: airbyte_api::DEFAULT_PAGE_SIZE,
        }
    }

    /// Point the client at another base URL (trailing slash is trimmed)
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Override the whole-request timeout
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL for a path relative to the base URL
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Process-wide server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Airbyte API access
    pub airbyte: AirbyteConfig,
    /// Protocol version offered when the client requests an unknown one
    pub protocol_version: String,
    /// Name reported in `serverInfo`
    pub server_name: String,
}

impl ServerConfig {
    /// Wrap an Airbyte configuration with default protocol settings
    #[must_use]
    pub fn new(airbyte: AirbyteConfig) -> Self {
        Self {
            airbyte,
            protocol_version: protocol::DEFAULT_MCP_PROTOCOL_VERSION.to_owned(),
            server_name: service_names::AIRBYTE_MCP_SERVER.to_owned(),
        }
    }

    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> ConfigResult<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let workspace_id =
            get(env_config::AIRBYTE_WORKSPACE_ID).ok_or(ConfigError::MissingVariable {
                name: env_config::AIRBYTE_WORKSPACE_ID,
            })?;

        let auth = if let Some(api_key) = get(env_config::AIRBYTE_API_KEY) {
            AirbyteAuth::ApiKey {
                api_key: SecretString::new(api_key),
            }
        } else {
            let client_id =
                get(env_config::AIRBYTE_CLIENT_ID).ok_or(ConfigError::MissingVariable {
                    name: env_config::AIRBYTE_CLIENT_ID,
                })?;
            let client_secret =
                get(env_config::AIRBYTE_CLIENT_SECRET).ok_or(ConfigError::MissingVariable {
                    name: env_config::AIRBYTE_CLIENT_SECRET,
                })?;
            AirbyteAuth::ClientCredentials {
                client_id,
                client_secret: SecretString::new(client_secret),
            }
        };

        let base_url = parse_base_url(
            get(env_config::AIRBYTE_API_BASE_URL)
                .as_deref()
                .unwrap_or(airbyte_api::DEFAULT_BASE_URL),
        )?;

        let request_timeout = parse_positive_secs(
            env_config::AIRBYTE_REQUEST_TIMEOUT_SECS,
            get(env_config::AIRBYTE_REQUEST_TIMEOUT_SECS),
            airbyte_api::DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let connect_timeout = parse_positive_secs(
            env_config::AIRBYTE_CONNECT_TIMEOUT_SECS,
            get(env_config::AIRBYTE_CONNECT_TIMEOUT_SECS),
            airbyte_api::DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;
        let page_size = parse_page_size(get(env_config::AIRBYTE_PAGE_SIZE))?;

        let config = Self {
            airbyte: AirbyteConfig {
                workspace_id,
                auth,
                base_url,
                request_timeout,
                connect_timeout,
                page_size,
            },
            protocol_version: get(env_config::MCP_PROTOCOL_VERSION)
                .unwrap_or_else(|| protocol::DEFAULT_MCP_PROTOCOL_VERSION.to_owned()),
            server_name: get(env_config::SERVER_NAME)
                .unwrap_or_else(|| service_names::AIRBYTE_MCP_SERVER.to_owned()),
        };

        debug!(auth_mode = %config.airbyte.auth.mode(), "Configuration parsed");
        Ok(config)
    }

    /// Log-safe configuration summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Airbyte MCP Server Configuration:\n\
             - Workspace: {}\n\
             - Auth Mode: {}\n\
             - API Base URL: {}\n\
             - Request Timeout: {}s\n\
             - Page Size: {}\n\
             - Protocol Version: {}",
            self.airbyte.workspace_id,
            self.airbyte.auth.mode(),
            self.airbyte.base_url,
            self.airbyte.request_timeout.as_secs_f64(),
            self.airbyte.page_size,
            self.protocol_version,
        )
    }
}

/// Load a dotenv file into the process environment, keeping variables that are already set
///
/// Returns whether a file was loaded. A missing file is not an error.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when the file exists but cannot be parsed.
pub fn load_dotenv(path: Option<&Path>) -> ConfigResult<bool> {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|()| ()),
        None => dotenvy::dotenv().map(|_| ()),
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::InvalidValue {
            name: "dotenv file",
            reason: e.to_string(),
        }),
    }
}

fn parse_base_url(raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        name: env_config::AIRBYTE_API_BASE_URL,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            name: env_config::AIRBYTE_API_BASE_URL,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(trimmed.to_owned())
}

fn parse_positive_secs(
    name: &'static str,
    raw: Option<String>,
    default: u64,
) -> ConfigResult<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            name,
            reason: "must be greater than 0".to_owned(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidValue {
            name,
            reason: e.to_string(),
        }),
    }
}

fn parse_page_size(raw: Option<String>) -> ConfigResult<u32> {
    let Some(raw) = raw else {
        return Ok(airbyte_api::DEFAULT_PAGE_SIZE);
    };

    let invalid = |reason: String| ConfigError::InvalidValue {
        name: env_config::AIRBYTE_PAGE_SIZE,
        reason,
    };

    let size = raw.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > airbyte_api::MAX_PAGE_SIZE {
        return Err(invalid(format!(
            "must be between 1 and {}",
            airbyte_api::MAX_PAGE_SIZE
        )));
    }
    Ok(size)
}
