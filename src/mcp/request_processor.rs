// ABOUTME: MCP request processing: validation, routing, and error mapping
// ABOUTME: Every component failure becomes exactly one protocol error response
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::protocol::{default_request_id, McpRequest, McpResponse, ProtocolHandler};
use super::resources::ServerResources;
use crate::constants::protocol::JSONRPC_VERSION;
use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Processes MCP protocol requests with validation, routing, and execution
pub struct McpRequestProcessor {
    resources: Arc<ServerResources>,
}

impl McpRequestProcessor {
    /// Create a new MCP request processor
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle an MCP request and return a response.
    ///
    /// Notifications are consumed without a response.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!(
            mcp_method = %request.method,
            mcp_id = ?request.id,
            "Received MCP request"
        );

        if request.method.starts_with("notifications/") {
            debug!("notification consumed: {}", request.method);
            return None;
        }

        let response = match self.process_request(&request).await {
            Ok(response) => response,
            Err(e) => Self::error_response(&request, &e),
        };
        Some(response)
    }

    async fn process_request(&self, request: &McpRequest) -> AppResult<McpResponse> {
        Self::validate_request(request)?;

        match request.method.as_str() {
            "initialize" => Ok(ProtocolHandler::handle_initialize(request)),
            "ping" => Ok(ProtocolHandler::handle_ping(request)),
            "tools/list" => Ok(ProtocolHandler::handle_tools_list(
                request,
                &self.resources.registry,
            )),
            "tools/call" => self.handle_tools_call(request).await,
            _ => Ok(ProtocolHandler::handle_unknown_method(request)),
        }
    }

    fn validate_request(request: &McpRequest) -> AppResult<()> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(AppError::invalid_input(format!(
                "Invalid JSON-RPC version: got '{}', expected '{}'",
                request.jsonrpc, JSONRPC_VERSION
            )));
        }
        if request.method.is_empty() {
            return Err(AppError::invalid_input("Missing method"));
        }
        Ok(())
    }

    async fn handle_tools_call(&self, request: &McpRequest) -> AppResult<McpResponse> {
        let params = request
            .params
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("Missing parameters for tools/call"))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::invalid_input("Missing tool name"))?;
        let arguments = params.get("arguments");

        let result = self.resources.registry.call(name, arguments).await?;
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        Ok(McpResponse::success(
            request_id,
            serde_json::to_value(result)?,
        ))
    }

    fn error_response(request: &McpRequest, e: &AppError) -> McpResponse {
        error!(
            "Failed to process MCP request: {e} | method={}, id={:?}",
            request.method, request.id
        );
        let request_id = request.id.clone().unwrap_or_else(default_request_id);
        McpResponse::error(request_id, e.code.jsonrpc_code(), e.to_string())
    }
}
