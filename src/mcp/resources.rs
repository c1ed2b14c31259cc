// ABOUTME: Shared server resources passed to every request handler
// ABOUTME: Read-only after construction, shared via Arc across concurrent invocations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::config::ServerConfig;
use crate::tools::ToolRegistry;

/// Shared, read-only server state.
///
/// The only data shared between concurrent invocations; nothing here is
/// mutated after startup, so no locking is required.
pub struct ServerResources {
    /// Environment-derived configuration
    pub config: ServerConfig,
    /// Tool registry for the active exposure mode
    pub registry: ToolRegistry,
}

impl ServerResources {
    /// Bundle configuration and registry for sharing
    #[must_use]
    pub const fn new(config: ServerConfig, registry: ToolRegistry) -> Self {
        Self { config, registry }
    }
}
