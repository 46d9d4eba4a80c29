// ABOUTME: Newline-delimited JSON-RPC transport over stdin/stdout for the MCP server
// ABOUTME: Reads one request per line, answers sequentially, and flushes after every frame
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Stdio Transport
//!
//! stdout carries protocol frames only; all diagnostics go through `tracing`
//! to stderr. Requests are handled one at a time, to completion, in arrival
//! order. A frame that is not UTF-8 or not JSON gets a parse error reply and
//! the loop keeps serving. EOF on the input ends the loop cleanly.

use super::mcp_request_processor::McpRequestProcessor;
use super::resources::ServerResources;
use crate::constants::errors::{ERROR_INVALID_REQUEST, ERROR_PARSE, MSG_PARSE_ERROR};
use crate::errors::AppResult;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::str;
use std::sync::Arc;
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, info, warn};

/// Handles stdio transport for MCP communication
pub struct StdioTransport {
    processor: McpRequestProcessor,
}

impl StdioTransport {
    /// Creates a new stdio transport instance
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self {
            processor: McpRequestProcessor::new(resources),
        }
    }

    /// Serve MCP on the process stdin/stdout until stdin closes
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin or writing stdout fails.
    pub async fn run(&self) -> AppResult<()> {
        info!("MCP stdio transport ready - listening on stdin/stdout");
        self.serve(BufReader::new(io::stdin()), io::stdout()).await
    }

    /// Serve MCP over an arbitrary line reader and writer
    ///
    /// # Errors
    ///
    /// Returns an error if the reader or writer fails.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut frame = Vec::new();

        loop {
            frame.clear();
            if reader.read_until(b'\n', &mut frame).await? == 0 {
                break;
            }

            let response = match str::from_utf8(&frame) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.process_line(line).await
                }
                Err(e) => {
                    warn!(error = %e, bytes = frame.len(), "JSON-RPC frame is not valid UTF-8");
                    Some(JsonRpcResponse::error(None, ERROR_PARSE, MSG_PARSE_ERROR))
                }
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        info!("stdin closed, MCP stdio transport shutting down");
        Ok(())
    }

    /// Turn one input line into at most one response
    async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message = match serde_json::from_str::<Value>(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Invalid JSON-RPC message");
                return Some(JsonRpcResponse::error(None, ERROR_PARSE, MSG_PARSE_ERROR));
            }
        };

        if !message.is_object() {
            warn!("JSON-RPC message is not an object");
            return Some(JsonRpcResponse::error(
                None,
                ERROR_INVALID_REQUEST,
                "Invalid Request: expected a JSON object",
            ));
        }

        if is_client_response(&message) {
            debug!("Ignoring JSON-RPC response from client");
            return None;
        }

        let id = message.get("id").cloned().filter(|id| !id.is_null());
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.processor.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "Malformed JSON-RPC request");
                Some(JsonRpcResponse::error(
                    id,
                    ERROR_INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                ))
            }
        }
    }
}

/// A message with an id and a result or error but no method
fn is_client_response(message: &Value) -> bool {
    message.get("method").is_none()
        && message.get("id").is_some()
        && (message.get("result").is_some() || message.get("error").is_some())
}

/// Write one newline-terminated JSON frame and flush it
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut frame = serde_json::to_vec(response)?;
    frame.push(b'\n');
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
