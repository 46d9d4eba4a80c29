// ABOUTME: Structured error types for Airbyte API operations
// ABOUTME: Classifies failures as authentication, network, or API errors with readable messages
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::config::environment::AuthMode;
use crate::constants::airbyte_api::MAX_ERROR_BODY_CHARS;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single Airbyte API call
#[derive(Debug, Clone, Error)]
pub enum AirbyteError {
    /// Credentials were rejected or the token exchange produced no token
    #[error("authentication failed ({mode}): {reason}")]
    Authentication {
        /// Auth path that was used
        mode: AuthMode,
        /// Why authentication failed
        reason: String,
    },

    /// The API could not be reached or did not answer in time
    #[error("network error: {reason}")]
    Network {
        /// Description of the transport failure
        reason: String,
        /// Whether the configured timeout elapsed
        timed_out: bool,
    },

    /// The API answered with a non-success status or an undecodable body
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or decode failure description
        body: String,
    },
}

/// Result type for Airbyte operations
pub type AirbyteResult<T> = Result<T, AirbyteError>;

impl AirbyteError {
    /// Classify a transport-level `reqwest` failure
    #[must_use]
    pub fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            return Self::Network {
                reason: format!("request timed out after {}s", timeout.as_secs_f64()),
                timed_out: true,
            };
        }

        let reason = if error.is_connect() {
            "could not connect to the Airbyte API".to_owned()
        } else {
            // Strip the URL so query strings never reach the agent or the logs
            error.without_url().to_string()
        };

        Self::Network {
            reason,
            timed_out: false,
        }
    }

    /// Classify a non-success response from a listing endpoint
    #[must_use]
    pub fn from_status(status: StatusCode, body: String, mode: AuthMode) -> Self {
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Self::Authentication {
                mode,
                reason: format!("HTTP {}", status.as_u16()),
            };
        }

        Self::Api {
            status: status.as_u16(),
            body,
        }
    }

    /// Short, actionable message for the calling agent
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication { mode, reason } => format!(
                "Authentication failed: check {} ({reason})",
                mode.credential_hint()
            ),
            Self::Network { reason, .. } => {
                format!("Network error contacting Airbyte API: {reason}")
            }
            Self::Api { status, body } => {
                let body = truncate_body(body);
                if body.is_empty() {
                    format!("Airbyte API error (HTTP {status})")
                } else {
                    format!("Airbyte API error (HTTP {status}): {body}")
                }
            }
        }
    }

    /// Whether the error came from a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                timed_out: true,
                ..
            }
        )
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_owned();
    }
    let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push('…');
    truncated
}
