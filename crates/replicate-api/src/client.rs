// ABOUTME: Authenticated HTTP gateway to the Replicate API
// ABOUTME: One method per resource/operation pair, exactly one round trip per call
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use crate::errors::ApiError;
use crate::models::{Job, PredictionRequest, TrainingRequest};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Production Replicate API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

/// Request timeout for API calls in seconds
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Connection timeout in seconds
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Global shared HTTP client with connection pooling
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        ClientBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Gateway to the Replicate API: one method per (resource, operation) pair.
///
/// Every method takes already-normalized parameters, issues exactly one HTTP
/// round trip, and returns the parsed response body. Retry and backoff, if
/// any, belong to the transport layer underneath, never here. The trait seam
/// exists so the poller and tool handlers can run against a stub in tests.
#[async_trait]
pub trait ReplicateApi: Send + Sync {
    /// Submit a new prediction job
    async fn create_prediction(&self, request: &PredictionRequest) -> Result<Job, ApiError>;
    /// Fetch current state of a prediction by id
    async fn get_prediction(&self, id: &str) -> Result<Job, ApiError>;
    /// Ask the remote API to cancel a prediction
    async fn cancel_prediction(&self, id: &str) -> Result<Job, ApiError>;
    /// List predictions, optionally resuming from a pagination cursor
    async fn list_predictions(&self, cursor: Option<&str>) -> Result<Value, ApiError>;

    /// Submit a new training job
    async fn create_training(&self, request: &TrainingRequest) -> Result<Job, ApiError>;
    /// Fetch current state of a training by id
    async fn get_training(&self, id: &str) -> Result<Job, ApiError>;
    /// Ask the remote API to cancel a training
    async fn cancel_training(&self, id: &str) -> Result<Job, ApiError>;
    /// List trainings, optionally resuming from a pagination cursor
    async fn list_trainings(&self, cursor: Option<&str>) -> Result<Value, ApiError>;

    /// Fetch one model by owner and name
    async fn get_model(&self, owner: &str, name: &str) -> Result<Value, ApiError>;
    /// List public models, optionally resuming from a pagination cursor
    async fn list_models(&self, cursor: Option<&str>) -> Result<Value, ApiError>;
    /// Full-text search over public models
    async fn search_models(&self, query: &str) -> Result<Value, ApiError>;

    /// Fetch one curated collection by slug
    async fn get_collection(&self, slug: &str) -> Result<Value, ApiError>;
    /// List curated collections, optionally resuming from a pagination cursor
    async fn list_collections(&self, cursor: Option<&str>) -> Result<Value, ApiError>;
}

/// Reqwest-backed [`ReplicateApi`] implementation bound to one base URL and
/// one bearer credential, both immutable after construction.
pub struct ReplicateClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl ReplicateClient {
    /// Create a client against the production API.
    ///
    /// # Errors
    /// Returns [`ApiError::BaseUrl`] only if the compiled-in default URL is
    /// unparseable, which would be a build defect.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (test or proxy deployments).
    ///
    /// # Errors
    /// Returns [`ApiError::BaseUrl`] if `base_url` is not an absolute URL.
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::BaseUrl {
            message: format!("{base_url}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl {
                message: format!("{base_url}: not a base URL"),
            });
        }
        Ok(Self {
            client: shared_client().clone(),
            base_url,
            token: token.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Validated as a base URL at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn paged_endpoint(&self, segments: &[&str], cursor: Option<&str>) -> Url {
        let mut url = self.endpoint(segments);
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }
        url
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                message: e.to_string(),
            })?;
        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| ApiError::Decode {
                message: e.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body).unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_owned()
            } else {
                body.clone()
            }
        });
        Err(ApiError::Http {
            status: status.as_u16(),
            detail,
        })
    }

    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        debug!("GET {url}");
        self.execute(self.client.get(url)).await
    }

    async fn post_json(&self, url: Url, body: Option<&Value>) -> Result<Value, ApiError> {
        debug!("POST {url}");
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    async fn get_job(&self, url: Url) -> Result<Job, ApiError> {
        decode_job(self.get_json(url).await?)
    }

    async fn post_job(&self, url: Url, body: Option<&Value>) -> Result<Job, ApiError> {
        decode_job(self.post_json(url, body).await?)
    }
}

fn decode_job(value: Value) -> Result<Job, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// Pull the structured `detail` (or `title`) field out of an error body.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .or_else(|| value.get("title"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[async_trait]
impl ReplicateApi for ReplicateClient {
    async fn create_prediction(&self, request: &PredictionRequest) -> Result<Job, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })?;
        self.post_job(self.endpoint(&["predictions"]), Some(&body))
            .await
    }

    async fn get_prediction(&self, id: &str) -> Result<Job, ApiError> {
        self.get_job(self.endpoint(&["predictions", id])).await
    }

    async fn cancel_prediction(&self, id: &str) -> Result<Job, ApiError> {
        self.post_job(self.endpoint(&["predictions", id, "cancel"]), None)
            .await
    }

    async fn list_predictions(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        self.get_json(self.paged_endpoint(&["predictions"], cursor))
            .await
    }

    async fn create_training(&self, request: &TrainingRequest) -> Result<Job, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })?;
        self.post_job(self.endpoint(&["trainings"]), Some(&body))
            .await
    }

    async fn get_training(&self, id: &str) -> Result<Job, ApiError> {
        self.get_job(self.endpoint(&["trainings", id])).await
    }

    async fn cancel_training(&self, id: &str) -> Result<Job, ApiError> {
        self.post_job(self.endpoint(&["trainings", id, "cancel"]), None)
            .await
    }

    async fn list_trainings(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        self.get_json(self.paged_endpoint(&["trainings"], cursor))
            .await
    }

    async fn get_model(&self, owner: &str, name: &str) -> Result<Value, ApiError> {
        self.get_json(self.endpoint(&["models", owner, name])).await
    }

    async fn list_models(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        self.get_json(self.paged_endpoint(&["models"], cursor))
            .await
    }

    async fn search_models(&self, query: &str) -> Result<Value, ApiError> {
        let mut url = self.endpoint(&["models"]);
        url.query_pairs_mut().append_pair("query", query);
        self.get_json(url).await
    }

    async fn get_collection(&self, slug: &str) -> Result<Value, ApiError> {
        self.get_json(self.endpoint(&["collections", slug])).await
    }

    async fn list_collections(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        self.get_json(self.paged_endpoint(&["collections"], cursor))
            .await
    }
}
