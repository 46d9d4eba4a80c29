// ABOUTME: Unified error type for the MCP protocol boundary
// ABOUTME: Maps application failures onto JSON-RPC error codes and messages
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling
//!
//! Domain modules define their own `thiserror` enums. Tool failures never
//! become JSON-RPC errors: they are folded into `isError` tool results.
//! Everything that does leave the server as a JSON-RPC error, or ends the
//! stdio loop, goes through [`AppError`], which carries an [`ErrorCode`] and a
//! message that is safe to show to the calling agent.

use crate::constants::errors::{
    ERROR_INTERNAL_ERROR, ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST, ERROR_METHOD_NOT_FOUND,
};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Protocol (1000-1999)
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest = 1001,
    #[serde(rename = "METHOD_NOT_FOUND")]
    MethodNotFound = 1002,
    #[serde(rename = "INVALID_PARAMS")]
    InvalidParams = 1003,

    // Internal Errors (9000-9999)
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
    #[serde(rename = "TRANSPORT_ERROR")]
    TransportError = 9002,
}

impl ErrorCode {
    /// JSON-RPC error code reported for this error
    #[must_use]
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::InvalidRequest => ERROR_INVALID_REQUEST,
            Self::MethodNotFound => ERROR_METHOD_NOT_FOUND,
            Self::InvalidParams => ERROR_INVALID_PARAMS,
            Self::SerializationError | Self::TransportError => ERROR_INTERNAL_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidRequest => "The message is not a valid JSON-RPC request",
            Self::MethodNotFound => "The requested method does not exist",
            Self::InvalidParams => "The request parameters are invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::TransportError => "Reading or writing the protocol stream failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// JSON-RPC error code for this error
    #[must_use]
    pub const fn jsonrpc_code(&self) -> i32 {
        self.code.jsonrpc_code()
    }

    /// Invalid JSON-RPC envelope
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Unknown method
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("Unknown method: {method}"))
    }

    /// Invalid parameters
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::new(ErrorCode::TransportError, error.to_string()).with_source(error)
    }
}
