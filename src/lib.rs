// ABOUTME: Main library entry point for the Replicate MCP server
// ABOUTME: Exposes the Replicate prediction API as MCP tools over stdio
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Replicate MCP Server
//!
//! A Model Context Protocol (MCP) server that translates tool invocations
//! into calls against the Replicate HTTP API: predictions, trainings,
//! models, and collections.
//!
//! ## Architecture
//!
//! - **Tools**: endpoint catalog, argument coercion, and the registry that
//!   dispatches static and dynamic tool calls
//! - **MCP**: JSON-RPC envelopes, protocol handlers, and the stdio transport
//! - **Config**: environment-only configuration (credential, default model
//!   version, poller tuning)
//! - The `replicate-api` workspace crate holds the HTTP gateway, job
//!   models, and the poll-until-terminal loop
//!
//! ## Quick Start
//!
//! 1. Export `REPLICATE_API_TOKEN`
//! 2. Start `replicate-mcp-server`
//! 3. Connect from Claude or another MCP client

/// Environment-based configuration
pub mod config;
/// Protocol, error-code, and client-limit constants
pub mod constants;
/// Unified error handling
pub mod errors;
/// Structured logging setup
pub mod logging;
/// MCP protocol front-end
pub mod mcp;
/// Tool catalog, coercion, and dispatch
pub mod tools;
