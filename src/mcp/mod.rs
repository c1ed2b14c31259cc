// ABOUTME: MCP protocol front-end: schema types, handlers, routing, and transport
// ABOUTME: Everything between the wire and the tool registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model Context Protocol implementation

/// Protocol envelopes and core handlers
pub mod protocol;
/// Request validation, routing, and error mapping
pub mod request_processor;
/// Shared server resources
pub mod resources;
/// Protocol schema types
pub mod schema;
/// Stdio transport
pub mod transport;

pub use protocol::{McpError, McpRequest, McpResponse, ProtocolHandler};
pub use request_processor::McpRequestProcessor;
pub use resources::ServerResources;
pub use schema::{Content, InitializeResponse, ToolResponse, ToolSchema};
pub use transport::StdioTransport;
