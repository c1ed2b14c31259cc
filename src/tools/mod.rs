// ABOUTME: Tool catalog, argument coercion, and registry/dispatch
// ABOUTME: Everything between the protocol front-end and the API gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool layer: catalog, coercion, and dispatch

/// Static catalog of Replicate API endpoints
pub mod catalog;
/// Argument validation and coercion
pub mod coerce;
/// Tool registry and dispatcher
pub mod registry;

pub use catalog::{EndpointSpec, OperationKind, Resource, CATALOG};
pub use coerce::{coerce, ParamSpec, ParamType};
pub use registry::{
    ClientProfile, ExposureMode, RegistryOptions, ToolFilter, ToolRegistry, WaitPolicy,
};
