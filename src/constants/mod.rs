// ABOUTME: Centralized constants for protocol versions, error codes, and client limits
// ABOUTME: Single source of truth so protocol literals never spread through the codebase
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application-wide constants

/// JSON-RPC and MCP error codes and messages
pub mod errors;
/// Client-profile tool naming limits
pub mod limits;
/// Protocol versions and server identity
pub mod protocol;
