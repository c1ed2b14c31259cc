// ABOUTME: Static catalog of Replicate API endpoints exposed as tools
// ABOUTME: One entry per resource/operation pair with its declared parameter schema
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Endpoint catalog.
//!
//! The catalog is the single boundary where operations are addressed by
//! string name: the static registry derives one tool per entry, and the
//! dynamic meta-tools discover and invoke entries by name. Inside the
//! registry everything is dispatched over the typed
//! ([`Resource`], [`OperationKind`]) pair an entry carries.

use crate::tools::coerce::{ParamSpec, ParamType};
use serde_json::{json, Map, Value};

/// Remote API resource an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// `/predictions` inference jobs
    Predictions,
    /// `/trainings` model-fitting jobs
    Trainings,
    /// `/models` public model registry
    Models,
    /// `/collections` curated model groups
    Collections,
}

impl Resource {
    /// Resource name as used in filters and the dynamic catalog listing
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Predictions => "predictions",
            Self::Trainings => "trainings",
            Self::Models => "models",
            Self::Collections => "collections",
        }
    }
}

/// Operation an endpoint performs against its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Submit a new job
    Create,
    /// Fetch one item by identifier
    Get,
    /// Ask the remote API to cancel a job
    Cancel,
    /// List items with optional pagination cursor
    List,
    /// Full-text search
    Search,
}

impl OperationKind {
    /// Operation name as used in filters and the dynamic catalog listing
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::Cancel => "cancel",
            Self::List => "list",
            Self::Search => "search",
        }
    }
}

/// One logical endpoint: a named (resource, operation) pair with its schema
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    /// Unique tool/endpoint name
    pub name: &'static str,
    /// Resource this endpoint operates on
    pub resource: Resource,
    /// Operation performed
    pub operation: OperationKind,
    /// Human-readable description, advertised in the schema
    pub description: &'static str,
    /// Declared parameters
    pub params: &'static [ParamSpec],
}

impl EndpointSpec {
    /// Catalog listing entry for the dynamic `list_api_endpoints` tool
    #[must_use]
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "resource": self.resource.as_str(),
            "operation": self.operation.as_str(),
            "description": self.description,
        })
    }

    /// JSON Schema for this endpoint's parameters
    #[must_use]
    pub fn input_schema(&self) -> Value {
        input_schema(self.params)
    }
}

/// Build a JSON Schema object from a declared parameter list
#[must_use]
pub fn input_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in params {
        let mut property = Map::new();
        property.insert("type".into(), Value::String(param.param_type.as_str().into()));
        property.insert("description".into(), Value::String(param.description.into()));
        if let Some(minimum) = param.minimum {
            property.insert("minimum".into(), Value::from(minimum));
        }
        if let Some(maximum) = param.maximum {
            property.insert("maximum".into(), Value::from(maximum));
        }
        if let Some(default) = param.default {
            let default = if param.param_type == ParamType::Integer {
                Value::from(default as i64)
            } else {
                Value::from(default)
            };
            property.insert("default".into(), default);
        }
        if let Some(values) = param.allowed_values {
            property.insert("enum".into(), json!(values));
        }
        properties.insert(param.name.to_owned(), Value::Object(property));
        if param.required {
            required.push(Value::String(param.name.to_owned()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    Value::Object(schema)
}

const PREDICTION_CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional(
        "version",
        ParamType::String,
        "Model version id to run; falls back to REPLICATE_MODEL_VERSION",
    ),
    ParamSpec::optional(
        "model",
        ParamType::String,
        "owner/name model identifier, alternative to version",
    ),
    ParamSpec::required("input", ParamType::Object, "Model input parameters"),
];

const JOB_ID_PARAMS: &[ParamSpec] = &[ParamSpec::required(
    "id",
    ParamType::String,
    "Job id assigned by the Replicate API",
)];

const CURSOR_PARAMS: &[ParamSpec] = &[ParamSpec::optional(
    "cursor",
    ParamType::String,
    "Pagination cursor from a previous list response",
)];

const TRAINING_CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("version", ParamType::String, "Base model version id to train from"),
    ParamSpec::required(
        "destination",
        ParamType::String,
        "owner/name of the model that receives the trained version",
    ),
    ParamSpec::required("input", ParamType::Object, "Training input parameters"),
];

const MODEL_GET_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("owner", ParamType::String, "Model owner username"),
    ParamSpec::required("name", ParamType::String, "Model name"),
];

const MODEL_SEARCH_PARAMS: &[ParamSpec] = &[ParamSpec::required(
    "query",
    ParamType::String,
    "Free-text search query",
)];

const COLLECTION_GET_PARAMS: &[ParamSpec] = &[ParamSpec::required(
    "slug",
    ParamType::String,
    "Collection slug, e.g. super-resolution",
)];

/// Every endpoint this server can expose, in listing order
pub const CATALOG: &[EndpointSpec] = &[
    EndpointSpec {
        name: "create_predictions",
        resource: Resource::Predictions,
        operation: OperationKind::Create,
        description: "Submit a prediction to run a model version on Replicate",
        params: PREDICTION_CREATE_PARAMS,
    },
    EndpointSpec {
        name: "get_predictions",
        resource: Resource::Predictions,
        operation: OperationKind::Get,
        description: "Fetch the current state of a prediction by id",
        params: JOB_ID_PARAMS,
    },
    EndpointSpec {
        name: "cancel_predictions",
        resource: Resource::Predictions,
        operation: OperationKind::Cancel,
        description: "Cancel a running prediction",
        params: JOB_ID_PARAMS,
    },
    EndpointSpec {
        name: "list_predictions",
        resource: Resource::Predictions,
        operation: OperationKind::List,
        description: "List recent predictions",
        params: CURSOR_PARAMS,
    },
    EndpointSpec {
        name: "create_trainings",
        resource: Resource::Trainings,
        operation: OperationKind::Create,
        description: "Start a training to fit a new model version",
        params: TRAINING_CREATE_PARAMS,
    },
    EndpointSpec {
        name: "get_trainings",
        resource: Resource::Trainings,
        operation: OperationKind::Get,
        description: "Fetch the current state of a training by id",
        params: JOB_ID_PARAMS,
    },
    EndpointSpec {
        name: "cancel_trainings",
        resource: Resource::Trainings,
        operation: OperationKind::Cancel,
        description: "Cancel a running training",
        params: JOB_ID_PARAMS,
    },
    EndpointSpec {
        name: "list_trainings",
        resource: Resource::Trainings,
        operation: OperationKind::List,
        description: "List recent trainings",
        params: CURSOR_PARAMS,
    },
    EndpointSpec {
        name: "get_models",
        resource: Resource::Models,
        operation: OperationKind::Get,
        description: "Fetch one model by owner and name",
        params: MODEL_GET_PARAMS,
    },
    EndpointSpec {
        name: "list_models",
        resource: Resource::Models,
        operation: OperationKind::List,
        description: "List public models",
        params: CURSOR_PARAMS,
    },
    EndpointSpec {
        name: "search_models",
        resource: Resource::Models,
        operation: OperationKind::Search,
        description: "Search public models by free text",
        params: MODEL_SEARCH_PARAMS,
    },
    EndpointSpec {
        name: "get_collections",
        resource: Resource::Collections,
        operation: OperationKind::Get,
        description: "Fetch one curated model collection by slug",
        params: COLLECTION_GET_PARAMS,
    },
    EndpointSpec {
        name: "list_collections",
        resource: Resource::Collections,
        operation: OperationKind::List,
        description: "List curated model collections",
        params: CURSOR_PARAMS,
    },
];

/// Look up a catalog entry by name
#[must_use]
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
    CATALOG.iter().find(|endpoint| endpoint.name == name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn find_is_exact() {
        assert!(find("create_predictions").is_some());
        assert!(find("create_prediction").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn input_schema_declares_required_fields() {
        let spec = find("create_trainings").unwrap();
        let schema = spec.input_schema();
        assert_eq!(schema["type"], "object");
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, ["version", "destination", "input"]);
    }

    #[test]
    fn cursor_only_schemas_omit_required() {
        let spec = find("list_predictions").unwrap();
        assert!(spec.input_schema().get("required").is_none());
    }
}
