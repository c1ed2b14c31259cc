// ABOUTME: Tool registry and dispatcher for static and dynamic exposure modes
// ABOUTME: Routes tool calls through coercion to the API gateway and job poller
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Tool registry.
//!
//! Tool names are resolved to typed catalog operations exactly once, at the
//! registry boundary; past that point dispatch runs over the tagged
//! `ToolKind` variants, never over strings. Exposure mode (which tools are
//! advertised) and job-wait policy (whether create calls poll to a terminal
//! state) are orthogonal configuration axes selected at construction.

use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::{ToolResponse, ToolSchema};
use crate::tools::catalog::{self, EndpointSpec, OperationKind, Resource};
use crate::tools::coerce::{coerce, ParamSpec, ParamType};
use replicate_api::{
    Job, JobKind, JobPoller, PollConfig, PredictionRequest, ReplicateApi, ReplicateClient,
    TokioWaiter, TrainingRequest, Waiter,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Which tool families are advertised to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExposureMode {
    /// One tool per catalog endpoint
    Static,
    /// Three meta-tools that discover and invoke endpoints by name
    Dynamic,
    /// Both families at once
    Both,
}

impl ExposureMode {
    const fn exposes_static(self) -> bool {
        matches!(self, Self::Static | Self::Both)
    }

    const fn exposes_dynamic(self) -> bool {
        matches!(self, Self::Dynamic | Self::Both)
    }
}

/// Whether job-creating tools wait for a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WaitPolicy {
    /// Poll created jobs to completion before returning
    Wait,
    /// Return the freshly submitted job; the caller polls via get tools
    NoWait,
}

/// Connecting client, selecting a cosmetic tool-name length cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClientProfile {
    /// Claude Desktop
    Claude,
    /// Cursor
    Cursor,
    /// No name length cap
    Generic,
}

impl ClientProfile {
    const fn name_limit(self) -> Option<usize> {
        match self {
            Self::Claude => Some(crate::constants::limits::CLAUDE_TOOL_NAME_LIMIT),
            Self::Cursor => Some(crate::constants::limits::CURSOR_TOOL_NAME_LIMIT),
            Self::Generic => None,
        }
    }
}

/// Startup filter restricting which static tools are registered.
///
/// Empty lists mean no restriction on that axis. Filters never affect the
/// dynamic meta-tools, which always expose the full catalog.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    /// Admit only these resources (predictions, trainings, models, collections)
    pub resources: Vec<String>,
    /// Admit only these operations (create, get, cancel, list, search)
    pub operations: Vec<String>,
    /// Admit only these tool names
    pub names: Vec<String>,
}

impl ToolFilter {
    fn admits(&self, name: &str, resource: Resource, operation: OperationKind) -> bool {
        let resource_ok = self.resources.is_empty()
            || self
                .resources
                .iter()
                .any(|r| r.eq_ignore_ascii_case(resource.as_str()));
        let operation_ok = self.operations.is_empty()
            || self
                .operations
                .iter()
                .any(|o| o.eq_ignore_ascii_case(operation.as_str()));
        let name_ok = self.names.is_empty() || self.names.iter().any(|n| n == name);
        resource_ok && operation_ok && name_ok
    }
}

/// Registry construction options
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Tool exposure mode
    pub mode: ExposureMode,
    /// Job-wait policy
    pub wait_policy: WaitPolicy,
    /// Client profile for the name length cap
    pub profile: ClientProfile,
    /// Static tool filter
    pub filter: ToolFilter,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            mode: ExposureMode::Static,
            wait_policy: WaitPolicy::Wait,
            profile: ClientProfile::Generic,
            filter: ToolFilter::default(),
        }
    }
}

/// Model version used by `generate_image` when no override is configured
/// (stability-ai/sdxl)
const DEFAULT_IMAGE_VERSION: &str =
    "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

const GENERATE_IMAGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("prompt", ParamType::String, "Text description of the image"),
    ParamSpec::bounded("width", "Image width in pixels", 256.0, 4096.0, 1024.0),
    ParamSpec::bounded("height", "Image height in pixels", 256.0, 4096.0, 1024.0),
    ParamSpec::bounded("num_outputs", "Number of images to generate", 1.0, 4.0, 1.0),
    ParamSpec::enumerated(
        "scheduler",
        "Diffusion scheduler",
        &[
            "DDIM",
            "DPMSolverMultistep",
            "HeunDiscrete",
            "KarrasDPM",
            "K_EULER_ANCESTRAL",
            "K_EULER",
            "PNDM",
        ],
    ),
    ParamSpec::bounded("num_inference_steps", "Denoising steps", 1.0, 500.0, 50.0),
    ParamSpec::bounded_number("guidance_scale", "Prompt adherence strength", 1.0, 20.0, 7.5),
    ParamSpec::optional("seed", ParamType::Integer, "Random seed for reproducibility"),
    ParamSpec::optional(
        "model",
        ParamType::String,
        "Model version id overriding the configured default",
    ),
];

const LIST_ENDPOINTS_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional(
        "resource",
        ParamType::String,
        "Restrict to one resource: predictions, trainings, models, or collections",
    ),
    ParamSpec::optional(
        "search",
        ParamType::String,
        "Free-text filter over endpoint name and resource",
    ),
];

const ENDPOINT_SCHEMA_PARAMS: &[ParamSpec] = &[ParamSpec::required(
    "name",
    ParamType::String,
    "Endpoint name from list_api_endpoints",
)];

const CALL_ENDPOINT_PARAMS: &[ParamSpec] = &[
    ParamSpec::required(
        "name",
        ParamType::String,
        "Endpoint name from list_api_endpoints",
    ),
    ParamSpec::optional(
        "parameters",
        ParamType::Object,
        "Arguments for the endpoint, per its declared schema",
    ),
];

/// Typed dispatch target of a registered tool
#[derive(Debug, Clone, Copy)]
enum ToolKind {
    /// Directly exposed catalog endpoint
    Endpoint(&'static EndpointSpec),
    /// Self-contained create-and-wait image tool
    GenerateImage,
    /// Dynamic: list the endpoint catalog
    ListEndpoints,
    /// Dynamic: fetch one endpoint's schema
    GetEndpointSchema,
    /// Dynamic: invoke an endpoint by name
    CallEndpoint,
}

struct RegisteredTool {
    name: String,
    kind: ToolKind,
}

impl RegisteredTool {
    fn descriptor(&self) -> ToolSchema {
        let (description, input_schema) = match self.kind {
            ToolKind::Endpoint(spec) => (spec.description, spec.input_schema()),
            ToolKind::GenerateImage => (
                "Generate an image from a text prompt and wait for the finished result",
                catalog::input_schema(GENERATE_IMAGE_PARAMS),
            ),
            ToolKind::ListEndpoints => (
                "List the Replicate API endpoints available through this server",
                catalog::input_schema(LIST_ENDPOINTS_PARAMS),
            ),
            ToolKind::GetEndpointSchema => (
                "Get the declared parameter schema for one API endpoint",
                catalog::input_schema(ENDPOINT_SCHEMA_PARAMS),
            ),
            ToolKind::CallEndpoint => (
                "Invoke any cataloged Replicate API endpoint by name",
                catalog::input_schema(CALL_ENDPOINT_PARAMS),
            ),
        };
        ToolSchema {
            name: self.name.clone(),
            description: description.to_owned(),
            input_schema,
        }
    }
}

/// Tool registry and dispatcher.
///
/// Holds the only shared state in the process: the authenticated gateway
/// and the resolved options, all read-only after construction.
pub struct ToolRegistry {
    api: Option<Arc<dyn ReplicateApi>>,
    waiter: Arc<dyn Waiter>,
    poll: PollConfig,
    default_version: Option<String>,
    wait_policy: WaitPolicy,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Build a registry backed by the real Replicate client.
    ///
    /// The gateway is only constructed when a credential is configured;
    /// without one the registry still lists tools, and any call that needs
    /// the API reports the missing credential inline.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be constructed.
    pub fn new(config: &ServerConfig, options: RegistryOptions) -> AppResult<Self> {
        let api: Option<Arc<dyn ReplicateApi>> = match &config.api.token {
            Some(token) => Some(Arc::new(ReplicateClient::new(token.clone())?)),
            None => None,
        };
        Ok(Self::with_api(api, config, options))
    }

    /// Build a registry over an explicit gateway (test seam)
    #[must_use]
    pub fn with_api(
        api: Option<Arc<dyn ReplicateApi>>,
        config: &ServerConfig,
        options: RegistryOptions,
    ) -> Self {
        let tools = Self::build_tools(&options);
        info!(
            "tool registry initialized with {} tool(s), mode={:?}, wait_policy={:?}",
            tools.len(),
            options.mode,
            options.wait_policy
        );
        Self {
            api,
            waiter: Arc::new(TokioWaiter),
            poll: config.poll.to_poll_config(),
            default_version: config.api.default_version.clone(),
            wait_policy: options.wait_policy,
            tools,
        }
    }

    /// Replace the poll waiter (test seam)
    #[must_use]
    pub fn with_waiter(mut self, waiter: Arc<dyn Waiter>) -> Self {
        self.waiter = waiter;
        self
    }

    fn build_tools(options: &RegistryOptions) -> Vec<RegisteredTool> {
        let limit = options.profile.name_limit();
        let mut tools = Vec::new();

        if options.mode.exposes_static() {
            for endpoint in catalog::CATALOG {
                if options
                    .filter
                    .admits(endpoint.name, endpoint.resource, endpoint.operation)
                {
                    tools.push(RegisteredTool {
                        name: capped(endpoint.name, limit),
                        kind: ToolKind::Endpoint(endpoint),
                    });
                }
            }
            // The self-contained tool only makes sense when creates wait
            if options.wait_policy == WaitPolicy::Wait
                && options.filter.admits(
                    "generate_image",
                    Resource::Predictions,
                    OperationKind::Create,
                )
            {
                tools.push(RegisteredTool {
                    name: capped("generate_image", limit),
                    kind: ToolKind::GenerateImage,
                });
            }
        }

        if options.mode.exposes_dynamic() {
            for (name, kind) in [
                ("list_api_endpoints", ToolKind::ListEndpoints),
                ("get_api_endpoint_schema", ToolKind::GetEndpointSchema),
                ("call_api_endpoint", ToolKind::CallEndpoint),
            ] {
                tools.push(RegisteredTool {
                    name: capped(name, limit),
                    kind,
                });
            }
        }

        tools
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool descriptors for `tools/list`
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(RegisteredTool::descriptor).collect()
    }

    /// Execute one tool call.
    ///
    /// # Errors
    ///
    /// Returns an unknown-tool error for unregistered names (surfaced as
    /// method-not-found, never invalid-params) and propagates coercion,
    /// gateway, and poll failures.
    pub async fn call(&self, name: &str, args: Option<&Value>) -> AppResult<ToolResponse> {
        // The only string-keyed tool lookup; everything past here is typed
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| AppError::unknown_tool(name))?;

        debug!("dispatching tool call: {name}");
        match tool.kind {
            ToolKind::Endpoint(spec) => {
                let normalized = coerce(spec.params, args)?;
                let value = self.execute_endpoint(spec, normalized).await?;
                text_response(&value)
            }
            ToolKind::GenerateImage => self.generate_image(args).await,
            ToolKind::ListEndpoints => list_endpoints(args),
            ToolKind::GetEndpointSchema => endpoint_schema(args),
            ToolKind::CallEndpoint => self.call_endpoint(args).await,
        }
    }

    async fn execute_endpoint(
        &self,
        spec: &EndpointSpec,
        mut normalized: Map<String, Value>,
    ) -> AppResult<Value> {
        let api = self.api.as_deref().ok_or_else(AppError::credential_missing)?;

        match (spec.resource, spec.operation) {
            (Resource::Predictions, OperationKind::Create) => {
                let request = PredictionRequest {
                    version: take_string(&mut normalized, "version")
                        .or_else(|| self.default_version.clone()),
                    model: take_string(&mut normalized, "model"),
                    input: normalized
                        .remove("input")
                        .unwrap_or_else(|| Value::Object(Map::new())),
                };
                let created = api.create_prediction(&request).await?;
                self.finish_job(api, JobKind::Prediction, created).await
            }
            (Resource::Predictions, OperationKind::Get) => {
                job_value(&api.get_prediction(required_str(&normalized, "id")?).await?)
            }
            (Resource::Predictions, OperationKind::Cancel) => job_value(
                &api.cancel_prediction(required_str(&normalized, "id")?)
                    .await?,
            ),
            (Resource::Predictions, OperationKind::List) => Ok(api
                .list_predictions(opt_str(&normalized, "cursor"))
                .await?),
            (Resource::Trainings, OperationKind::Create) => {
                let request = TrainingRequest {
                    version: take_required_string(&mut normalized, "version")?,
                    destination: take_required_string(&mut normalized, "destination")?,
                    input: normalized
                        .remove("input")
                        .unwrap_or_else(|| Value::Object(Map::new())),
                };
                let created = api.create_training(&request).await?;
                self.finish_job(api, JobKind::Training, created).await
            }
            (Resource::Trainings, OperationKind::Get) => {
                job_value(&api.get_training(required_str(&normalized, "id")?).await?)
            }
            (Resource::Trainings, OperationKind::Cancel) => {
                job_value(&api.cancel_training(required_str(&normalized, "id")?).await?)
            }
            (Resource::Trainings, OperationKind::List) => {
                Ok(api.list_trainings(opt_str(&normalized, "cursor")).await?)
            }
            (Resource::Models, OperationKind::Get) => Ok(api
                .get_model(
                    required_str(&normalized, "owner")?,
                    required_str(&normalized, "name")?,
                )
                .await?),
            (Resource::Models, OperationKind::List) => {
                Ok(api.list_models(opt_str(&normalized, "cursor")).await?)
            }
            (Resource::Models, OperationKind::Search) => {
                Ok(api.search_models(required_str(&normalized, "query")?).await?)
            }
            (Resource::Collections, OperationKind::Get) => {
                Ok(api.get_collection(required_str(&normalized, "slug")?).await?)
            }
            (Resource::Collections, OperationKind::List) => {
                Ok(api.list_collections(opt_str(&normalized, "cursor")).await?)
            }
            (resource, operation) => Err(AppError::internal(format!(
                "unsupported operation {}/{}",
                resource.as_str(),
                operation.as_str()
            ))),
        }
    }

    async fn finish_job(
        &self,
        api: &dyn ReplicateApi,
        kind: JobKind,
        created: Job,
    ) -> AppResult<Value> {
        match self.wait_policy {
            WaitPolicy::NoWait => Ok(serde_json::to_value(created)?),
            WaitPolicy::Wait => {
                let poller = JobPoller::with_config(api, self.waiter.as_ref(), self.poll.clone());
                let finished = poller.wait_until_terminal(kind, &created.id).await?;
                Ok(serde_json::to_value(finished)?)
            }
        }
    }

    async fn generate_image(&self, args: Option<&Value>) -> AppResult<ToolResponse> {
        let mut normalized = coerce(GENERATE_IMAGE_PARAMS, args)?;
        let api = self.api.as_deref().ok_or_else(AppError::credential_missing)?;

        let version = take_string(&mut normalized, "model")
            .or_else(|| self.default_version.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE_VERSION.to_owned());
        let request = PredictionRequest {
            version: Some(version),
            model: None,
            input: Value::Object(normalized),
        };

        let created = api.create_prediction(&request).await?;
        info!("prediction {} submitted, waiting for completion", created.id);
        let poller = JobPoller::with_config(api, self.waiter.as_ref(), self.poll.clone());
        let finished = poller
            .wait_until_terminal(JobKind::Prediction, &created.id)
            .await?;

        let url = first_output_url(&finished).ok_or_else(|| {
            AppError::internal(format!("prediction {} succeeded without output", finished.id))
        })?;
        Ok(ToolResponse::text(url))
    }

    async fn call_endpoint(&self, args: Option<&Value>) -> AppResult<ToolResponse> {
        let mut normalized = coerce(CALL_ENDPOINT_PARAMS, args)?;
        let name = take_required_string(&mut normalized, "name")?;
        let spec = catalog::find(&name).ok_or_else(|| AppError::unknown_endpoint(&name))?;

        let parameters = normalized.remove("parameters");
        let inner = coerce(spec.params, parameters.as_ref())?;
        let value = self.execute_endpoint(spec, inner).await?;
        text_response(&value)
    }
}

fn list_endpoints(args: Option<&Value>) -> AppResult<ToolResponse> {
    let normalized = coerce(LIST_ENDPOINTS_PARAMS, args)?;
    let resource = opt_str(&normalized, "resource");
    let search = opt_str(&normalized, "search").map(str::to_lowercase);

    let endpoints: Vec<Value> = catalog::CATALOG
        .iter()
        .filter(|endpoint| {
            resource.map_or(true, |r| endpoint.resource.as_str().eq_ignore_ascii_case(r))
        })
        .filter(|endpoint| {
            search.as_deref().map_or(true, |needle| {
                endpoint.name.to_lowercase().contains(needle)
                    || endpoint.resource.as_str().contains(needle)
            })
        })
        .map(EndpointSpec::describe)
        .collect();

    text_response(&json!({ "endpoints": endpoints }))
}

fn endpoint_schema(args: Option<&Value>) -> AppResult<ToolResponse> {
    let normalized = coerce(ENDPOINT_SCHEMA_PARAMS, args)?;
    let name = required_str(&normalized, "name")?;
    let spec = catalog::find(name).ok_or_else(|| AppError::unknown_endpoint(name))?;

    text_response(&json!({
        "name": spec.name,
        "resource": spec.resource.as_str(),
        "operation": spec.operation.as_str(),
        "description": spec.description,
        "inputSchema": spec.input_schema(),
    }))
}

fn capped(name: &str, limit: Option<usize>) -> String {
    limit.map_or_else(
        || name.to_owned(),
        |limit| name.chars().take(limit).collect(),
    )
}

fn text_response(value: &Value) -> AppResult<ToolResponse> {
    Ok(ToolResponse::text(serde_json::to_string_pretty(value)?))
}

fn job_value(job: &Job) -> AppResult<Value> {
    Ok(serde_json::to_value(job)?)
}

/// First output URL reported by a finished job.
///
/// A succeeded job carries its `output` as a JSON array of URL strings; this
/// returns the first string entry, tolerating a bare string, and yields `None`
/// when the output is absent or holds no string.
fn first_output_url(job: &Job) -> Option<String> {
    match job.output.as_ref()? {
        Value::Array(items) => items.iter().find_map(Value::as_str).map(ToOwned::to_owned),
        Value::String(url) => Some(url.clone()),
        _ => None,
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    map.remove(key)
        .and_then(|value| value.as_str().map(ToOwned::to_owned))
}

fn take_required_string(map: &mut Map<String, Value>, key: &str) -> AppResult<String> {
    take_string(map, key).ok_or_else(|| AppError::missing_field(key))
}

fn required_str<'a>(map: &'a Map<String, Value>, key: &str) -> AppResult<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::missing_field(key))
}

fn opt_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}
