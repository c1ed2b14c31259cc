// ABOUTME: Stdio transport for MCP communication with per-request task spawning
// ABOUTME: Line-delimited JSON-RPC over stdin/stdout; logs stay on stderr
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Stdio transport.
//!
//! Each request runs in its own task so an invocation suspended in a poll
//! loop never blocks the read loop, and the transport stays responsive to
//! unrelated calls. Responses are serialized through a shared stdout guard
//! so concurrent completions never interleave bytes.
//!
//! On an operator interrupt the transport closes and the process exits
//! cleanly; in-flight poll loops get no grace period because no state needs
//! to be persisted.

use super::protocol::{McpRequest, McpResponse};
use super::request_processor::McpRequestProcessor;
use super::resources::ServerResources;
use crate::constants::errors::{ERROR_PARSE, MSG_PARSE_ERROR};
use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Handles stdio transport for MCP communication
pub struct StdioTransport {
    resources: Arc<ServerResources>,
}

impl StdioTransport {
    /// Creates a new stdio transport instance
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Run the transport until stdin closes or an interrupt arrives.
    ///
    /// # Errors
    /// Returns an error if reading from stdin fails.
    pub async fn run(&self) -> AppResult<()> {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();
        let stdout = Arc::new(Mutex::new(tokio::io::stdout()));

        info!("MCP stdio transport ready - listening on stdin/stdout");

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown signal received, closing transport");
                    break;
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if line.trim().is_empty() {
                                continue;
                            }
                            self.dispatch_line(line, &stdout);
                        }
                        Ok(None) => {
                            info!("stdin closed, shutting down");
                            break;
                        }
                        Err(e) => {
                            return Err(AppError::internal(format!("stdin read failed: {e}")));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Hand one raw line to its own task and return to the read loop
    fn dispatch_line(&self, line: String, stdout: &Arc<Mutex<tokio::io::Stdout>>) {
        let resources = self.resources.clone();
        let stdout = stdout.clone();
        tokio::spawn(async move {
            let response = match serde_json::from_str::<McpRequest>(&line) {
                Ok(request) => {
                    McpRequestProcessor::new(resources)
                        .handle_request(request)
                        .await
                }
                Err(e) => {
                    warn!("Invalid JSON-RPC message: {e}");
                    Some(parse_error_response())
                }
            };

            if let Some(response) = response {
                if let Err(e) = write_response(&response, &stdout).await {
                    error!("failed to write response: {e}");
                }
            }
        });
    }
}

/// Write one MCP response line to the shared stdout
///
/// # Errors
/// Returns an error if JSON serialization fails or I/O operations fail
pub async fn write_response(
    response: &McpResponse,
    stdout: &Arc<Mutex<tokio::io::Stdout>>,
) -> AppResult<()> {
    let response_json = serde_json::to_string(response)
        .map_err(|e| AppError::internal(format!("JSON serialization failed: {e}")))?;

    let mut stdout_lock = stdout.lock().await;
    stdout_lock
        .write_all(response_json.as_bytes())
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
    stdout_lock
        .write_all(b"\n")
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
    stdout_lock
        .flush()
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
    drop(stdout_lock);

    Ok(())
}

/// JSON-RPC parse error response with a null id
fn parse_error_response() -> McpResponse {
    McpResponse::error(Value::Null, ERROR_PARSE, MSG_PARSE_ERROR.to_owned())
}
