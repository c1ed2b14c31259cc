// ABOUTME: Client-profile specific limits applied at tool registration
// ABOUTME: Some MCP clients truncate or reject tool names past a fixed length

//! Client-profile limits
//!
//! The limit is cosmetic only: it caps the advertised tool-name length for
//! clients that cannot display or address longer names. It never changes
//! which operations are available.

/// Tool-name length cap for Claude Desktop
pub const CLAUDE_TOOL_NAME_LIMIT: usize = 64;

/// Tool-name length cap for Cursor
pub const CURSOR_TOOL_NAME_LIMIT: usize = 46;
