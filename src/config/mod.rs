// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration, no files and no persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration module for the Replicate MCP server

/// Environment and server configuration
pub mod environment;

pub use environment::{PollSettings, ReplicateApiConfig, ServerConfig};
