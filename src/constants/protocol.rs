// ABOUTME: Protocol version and server identity constants
// ABOUTME: JSON-RPC version, MCP protocol revision, and server name/version strings

//! Protocol constants

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this server implements
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name advertised during initialize
pub const SERVER_NAME: &str = "replicate-mcp-server";

/// Server version advertised during initialize
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
