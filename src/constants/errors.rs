// ABOUTME: Error code constants for JSON-RPC and MCP protocol errors
// ABOUTME: Defines standard error codes and corresponding error messages

//! Error codes for JSON-RPC and MCP protocols

/// Parse error (malformed JSON on the transport)
pub const ERROR_PARSE: i32 = -32700;

/// Invalid request (well-formed JSON, unusable request)
pub const ERROR_INVALID_REQUEST: i32 = -32600;

/// Method not found
pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;

/// Invalid parameters
pub const ERROR_INVALID_PARAMS: i32 = -32602;

/// Internal error
pub const ERROR_INTERNAL_ERROR: i32 = -32603;

/// Common error messages
pub const MSG_PARSE_ERROR: &str = "Parse error";
/// Method-not-found message
pub const MSG_METHOD_NOT_FOUND: &str = "Method not found";
/// Invalid-parameters message
pub const MSG_INVALID_PARAMS: &str = "Invalid parameters";
/// Internal-error message
pub const MSG_INTERNAL_ERROR: &str = "Internal error";
