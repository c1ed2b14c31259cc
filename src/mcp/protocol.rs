// ABOUTME: MCP protocol message envelopes and core protocol handlers
// ABOUTME: Handles initialize, ping, tools/list, and unknown-method responses
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # MCP Protocol Handlers
//!
//! JSON-RPC envelopes and the handlers for protocol-level operations that
//! need no tool dispatch.

use crate::constants::errors::{ERROR_INTERNAL_ERROR, ERROR_METHOD_NOT_FOUND};
use crate::constants::protocol::JSONRPC_VERSION;
use crate::mcp::schema::InitializeResponse;
use crate::tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// MCP request envelope
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// Method name, e.g. `tools/call`
    pub method: String,
    /// Method parameters
    pub params: Option<Value>,
    /// Optional ID - notifications don't have IDs, only regular requests do
    pub id: Option<Value>,
}

/// MCP response envelope
#[derive(Debug, Serialize)]
pub struct McpResponse {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// Result payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
    /// Mirrors the request id
    pub id: Value,
}

/// MCP error payload
#[derive(Debug, Serialize)]
pub struct McpError {
    /// JSON-RPC error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Optional structured detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    /// Create a successful MCP response
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error MCP response
    #[must_use]
    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(McpError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Default ID for responses to requests that carried none
pub(crate) fn default_request_id() -> Value {
    Value::Number(serde_json::Number::from(0))
}

/// MCP protocol handlers
pub struct ProtocolHandler;

impl ProtocolHandler {
    /// Handle initialize request
    #[must_use]
    pub fn handle_initialize(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        match serde_json::to_value(InitializeResponse::current()) {
            Ok(result) => McpResponse::success(request_id, result),
            Err(_) => McpResponse::error(
                request_id,
                ERROR_INTERNAL_ERROR,
                "Internal error".to_owned(),
            ),
        }
    }

    /// Handle ping request
    #[must_use]
    pub fn handle_ping(request: &McpRequest) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::success(request_id, serde_json::json!({}))
    }

    /// Handle tools list request
    #[must_use]
    pub fn handle_tools_list(request: &McpRequest, registry: &ToolRegistry) -> McpResponse {
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::success(
            request_id,
            serde_json::json!({ "tools": registry.descriptors() }),
        )
    }

    /// Handle unknown method request
    #[must_use]
    pub fn handle_unknown_method(request: &McpRequest) -> McpResponse {
        warn!("Unknown MCP method: {}", request.method);
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::error(
            request_id,
            ERROR_METHOD_NOT_FOUND,
            format!("Unknown method: {}", request.method),
        )
    }
}
