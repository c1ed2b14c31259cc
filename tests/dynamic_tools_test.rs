// ABOUTME: Integration tests for the dynamic meta-tools
// ABOUTME: Catalog listing with filters, schema fetch, and invoke-by-name routing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{registry_with, registry_without_api, response_text, StubApi};
use replicate_mcp_server::errors::ErrorCode;
use replicate_mcp_server::tools::{
    ClientProfile, ExposureMode, RegistryOptions, ToolFilter, WaitPolicy, CATALOG,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn dynamic_options() -> RegistryOptions {
    RegistryOptions {
        mode: ExposureMode::Dynamic,
        wait_policy: WaitPolicy::NoWait,
        profile: ClientProfile::Generic,
        filter: ToolFilter::default(),
    }
}

fn parse(response: &replicate_mcp_server::mcp::ToolResponse) -> Value {
    serde_json::from_str(&response_text(response)).unwrap()
}

#[test]
fn dynamic_mode_exposes_exactly_three_meta_tools() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());
    let names: Vec<_> = registry
        .descriptors()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(
        names,
        [
            "list_api_endpoints",
            "get_api_endpoint_schema",
            "call_api_endpoint"
        ]
    );
}

#[tokio::test]
async fn list_endpoints_without_filters_returns_the_full_catalog() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());

    let response = registry.call("list_api_endpoints", None).await.unwrap();
    let endpoints = parse(&response)["endpoints"].as_array().unwrap().clone();
    assert_eq!(endpoints.len(), CATALOG.len());
}

#[tokio::test]
async fn list_endpoints_resource_filter_is_exact() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());

    let response = registry
        .call("list_api_endpoints", Some(&json!({ "resource": "predictions" })))
        .await
        .unwrap();
    let endpoints = parse(&response)["endpoints"].as_array().unwrap().clone();

    assert_eq!(endpoints.len(), 4);
    for endpoint in &endpoints {
        assert_eq!(endpoint["resource"], "predictions");
    }
}

#[tokio::test]
async fn list_endpoints_search_matches_name_and_resource() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());

    let response = registry
        .call("list_api_endpoints", Some(&json!({ "search": "cancel" })))
        .await
        .unwrap();
    let endpoints = parse(&response)["endpoints"].as_array().unwrap().clone();
    let names: Vec<_> = endpoints
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["cancel_predictions", "cancel_trainings"]);
}

#[tokio::test]
async fn endpoint_schema_reports_declared_parameters() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());

    let response = registry
        .call(
            "get_api_endpoint_schema",
            Some(&json!({ "name": "create_trainings" })),
        )
        .await
        .unwrap();
    let schema = parse(&response);

    assert_eq!(schema["name"], "create_trainings");
    assert_eq!(schema["resource"], "trainings");
    assert_eq!(schema["operation"], "create");
    let required: Vec<_> = schema["inputSchema"]["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(required, ["version", "destination", "input"]);
}

#[tokio::test]
async fn unknown_endpoint_name_is_method_not_found_class() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());

    let err = registry
        .call("get_api_endpoint_schema", Some(&json!({ "name": "bogus" })))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownEndpoint);
    assert_eq!(err.code.jsonrpc_code(), -32601);

    let err = registry
        .call("call_api_endpoint", Some(&json!({ "name": "bogus" })))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownEndpoint);
}

#[tokio::test]
async fn call_endpoint_routes_through_the_same_handlers() {
    let api = Arc::new(StubApi::new());
    let registry = registry_with(api.clone(), dynamic_options());

    let response = registry
        .call(
            "call_api_endpoint",
            Some(&json!({
                "name": "search_models",
                "parameters": { "query": "sdxl" }
            })),
        )
        .await
        .unwrap();
    assert_eq!(parse(&response)["query"], "sdxl");
}

#[tokio::test]
async fn call_endpoint_coerces_inner_parameters() {
    let registry = registry_with(Arc::new(StubApi::new()), dynamic_options());

    // search_models requires `query`; the inner bag omits it
    let err = registry
        .call(
            "call_api_endpoint",
            Some(&json!({ "name": "search_models", "parameters": {} })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn dynamic_create_without_credential_is_invalid_request() {
    let registry = registry_without_api(dynamic_options());

    // Discovery works without a token
    assert!(registry.call("list_api_endpoints", None).await.is_ok());

    // Invocation does not
    let err = registry
        .call(
            "call_api_endpoint",
            Some(&json!({
                "name": "create_predictions",
                "parameters": { "version": "v1", "input": {} }
            })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CredentialMissing);
    assert_eq!(err.code.jsonrpc_code(), -32600);
}

#[test]
fn both_mode_exposes_static_and_dynamic_families() {
    let registry = registry_with(
        Arc::new(StubApi::new()),
        RegistryOptions {
            mode: ExposureMode::Both,
            wait_policy: WaitPolicy::Wait,
            profile: ClientProfile::Generic,
            filter: ToolFilter::default(),
        },
    );
    let names: Vec<_> = registry
        .descriptors()
        .into_iter()
        .map(|d| d.name)
        .collect();

    // 13 catalog endpoints + generate_image + 3 meta-tools
    assert_eq!(names.len(), CATALOG.len() + 4);
    assert!(names.contains(&"create_predictions".to_owned()));
    assert!(names.contains(&"generate_image".to_owned()));
    assert!(names.contains(&"call_api_endpoint".to_owned()));
}
