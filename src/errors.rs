// ABOUTME: Unified error handling for the Replicate MCP server
// ABOUTME: Error codes with a fixed mapping onto the JSON-RPC error taxonomy
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Unified Error Handling
//!
//! Central error types for the server crate. Every failure a component can
//! raise carries an [`ErrorCode`], and every code maps to exactly one
//! JSON-RPC error code at the protocol boundary, so no error is ever
//! silently swallowed or ambiguously surfaced.

use crate::constants::errors::{
    ERROR_INTERNAL_ERROR, ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST, ERROR_METHOD_NOT_FOUND,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation
    /// Argument bag malformed or a field has the wrong type
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A required field is absent from the argument bag
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,

    // Dispatch
    /// Tool name not registered in the active exposure mode
    #[serde(rename = "UNKNOWN_TOOL")]
    UnknownTool,
    /// Dynamic endpoint name not present in the catalog
    #[serde(rename = "UNKNOWN_ENDPOINT")]
    UnknownEndpoint,

    // Credentials
    /// No API credential configured at call time
    #[serde(rename = "CREDENTIAL_MISSING")]
    CredentialMissing,

    // External service
    /// Upstream HTTP failure (non-2xx or transport error)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Remote job reached failed or canceled status
    #[serde(rename = "JOB_FAILED")]
    JobFailed,

    // Internal
    /// Configuration error at startup
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Data serialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Anything unexpected
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// JSON-RPC error code this application error surfaces as.
    ///
    /// Unknown-name failures map to method-not-found, never to
    /// invalid-params; a missing credential at call time is an
    /// invalid-request, distinct from the startup-time hard failure.
    #[must_use]
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => ERROR_INVALID_PARAMS,
            Self::UnknownTool | Self::UnknownEndpoint => ERROR_METHOD_NOT_FOUND,
            Self::CredentialMissing => ERROR_INVALID_REQUEST,
            Self::ExternalServiceError
            | Self::JobFailed
            | Self::ConfigError
            | Self::SerializationError
            | Self::InternalError => ERROR_INTERNAL_ERROR,
        }
    }

    /// User-facing description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::UnknownTool => "The requested tool is not registered",
            Self::UnknownEndpoint => "The requested API endpoint is not in the catalog",
            Self::CredentialMissing => "No Replicate API token is configured",
            Self::ExternalServiceError => "The Replicate API reported an error",
            Self::JobFailed => "The remote job did not succeed",
            Self::ConfigError => "Configuration error encountered",
            Self::SerializationError => "Data serialization failed",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field absent
    pub fn missing_field(name: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("missing required parameter: {name}"),
        )
    }

    /// Tool name not registered
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorCode::UnknownTool, format!("Unknown tool: {name}"))
    }

    /// Dynamic endpoint name not in the catalog
    pub fn unknown_endpoint(name: &str) -> Self {
        Self::new(
            ErrorCode::UnknownEndpoint,
            format!("Unknown API endpoint: {name}"),
        )
    }

    /// No credential configured at call time
    pub fn credential_missing() -> Self {
        Self::new(
            ErrorCode::CredentialMissing,
            "REPLICATE_API_TOKEN is not configured",
        )
    }

    /// Serialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl From<replicate_api::ApiError> for AppError {
    fn from(error: replicate_api::ApiError) -> Self {
        Self {
            code: ErrorCode::ExternalServiceError,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

impl From<replicate_api::PollError> for AppError {
    fn from(error: replicate_api::PollError) -> Self {
        match error {
            replicate_api::PollError::Api(api) => api.into(),
            other => Self {
                code: ErrorCode::JobFailed,
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonrpc_mapping_is_total_and_disjoint() {
        assert_eq!(ErrorCode::InvalidInput.jsonrpc_code(), -32602);
        assert_eq!(ErrorCode::MissingRequiredField.jsonrpc_code(), -32602);
        assert_eq!(ErrorCode::UnknownTool.jsonrpc_code(), -32601);
        assert_eq!(ErrorCode::UnknownEndpoint.jsonrpc_code(), -32601);
        assert_eq!(ErrorCode::CredentialMissing.jsonrpc_code(), -32600);
        assert_eq!(ErrorCode::ExternalServiceError.jsonrpc_code(), -32603);
        assert_eq!(ErrorCode::JobFailed.jsonrpc_code(), -32603);
    }

    #[test]
    fn api_errors_surface_upstream_detail() {
        let app: AppError = replicate_api::ApiError::Http {
            status: 422,
            detail: "Invalid version".into(),
        }
        .into();
        assert_eq!(app.code, ErrorCode::ExternalServiceError);
        assert!(app.message.contains("422"));
        assert!(app.message.contains("Invalid version"));
    }

    #[test]
    fn poll_failures_map_to_job_failed() {
        let app: AppError = replicate_api::PollError::Failed {
            id: "p-1".into(),
            message: "boom".into(),
        }
        .into();
        assert_eq!(app.code, ErrorCode::JobFailed);
        assert!(app.message.contains("boom"));
    }
}
