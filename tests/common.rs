// ABOUTME: Shared test fixtures: a scripted gateway stub and a no-op waiter
// ABOUTME: Lets registry and poller behavior run without network or real delays
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use replicate_api::{
    ApiError, Job, JobStatus, PredictionRequest, ReplicateApi, TrainingRequest, Waiter,
};
use replicate_mcp_server::config::environment::{PollSettings, ReplicateApiConfig, ServerConfig};
use replicate_mcp_server::tools::{RegistryOptions, ToolRegistry};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Waiter that returns immediately
pub struct NoopWaiter;

#[async_trait]
impl Waiter for NoopWaiter {
    async fn wait(&self, _interval: Duration) {}
}

/// Build a bare job with the given id and status
pub fn job(id: &str, status: &str) -> Job {
    Job {
        id: id.to_owned(),
        status: JobStatus(status.to_owned()),
        output: None,
        error: None,
        created_at: None,
        completed_at: None,
        extra: serde_json::Map::new(),
    }
}

/// Gateway stub serving canned responses and recording calls
pub struct StubApi {
    /// Number of create calls (predictions and trainings)
    pub create_calls: AtomicU32,
    /// Number of get calls (predictions and trainings)
    pub get_calls: AtomicU32,
    /// Last prediction create payload seen
    pub last_prediction: Mutex<Option<PredictionRequest>>,
    /// Last training create payload seen
    pub last_training: Mutex<Option<TrainingRequest>>,
    /// Last pagination cursor seen by any list call
    pub last_cursor: Mutex<Option<String>>,
    created: Job,
    gets: Mutex<VecDeque<Job>>,
}

impl StubApi {
    /// Stub whose create returns id "X" in `starting` state and whose gets
    /// serve `script` in order
    pub fn with_get_script(script: Vec<Job>) -> Self {
        Self {
            create_calls: AtomicU32::new(0),
            get_calls: AtomicU32::new(0),
            last_prediction: Mutex::new(None),
            last_training: Mutex::new(None),
            last_cursor: Mutex::new(None),
            created: job("X", "starting"),
            gets: Mutex::new(script.into()),
        }
    }

    /// Stub with no scripted gets (for tools that never poll)
    pub fn new() -> Self {
        Self::with_get_script(Vec::new())
    }

    fn exhausted() -> ApiError {
        ApiError::Transport {
            message: "get script exhausted".into(),
        }
    }
}

#[async_trait]
impl ReplicateApi for StubApi {
    async fn create_prediction(&self, request: &PredictionRequest) -> Result<Job, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prediction.lock().unwrap() = Some(request.clone());
        Ok(self.created.clone())
    }

    async fn get_prediction(&self, _id: &str) -> Result<Job, ApiError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.gets
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(Self::exhausted)
    }

    async fn cancel_prediction(&self, id: &str) -> Result<Job, ApiError> {
        Ok(job(id, "canceled"))
    }

    async fn list_predictions(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        *self.last_cursor.lock().unwrap() = cursor.map(ToOwned::to_owned);
        Ok(json!({ "results": [], "next": null }))
    }

    async fn create_training(&self, request: &TrainingRequest) -> Result<Job, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_training.lock().unwrap() = Some(request.clone());
        Ok(self.created.clone())
    }

    async fn get_training(&self, id: &str) -> Result<Job, ApiError> {
        self.get_prediction(id).await
    }

    async fn cancel_training(&self, id: &str) -> Result<Job, ApiError> {
        Ok(job(id, "canceled"))
    }

    async fn list_trainings(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        self.list_predictions(cursor).await
    }

    async fn get_model(&self, owner: &str, name: &str) -> Result<Value, ApiError> {
        Ok(json!({ "owner": owner, "name": name }))
    }

    async fn list_models(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        *self.last_cursor.lock().unwrap() = cursor.map(ToOwned::to_owned);
        Ok(json!({ "results": [] }))
    }

    async fn search_models(&self, query: &str) -> Result<Value, ApiError> {
        Ok(json!({ "query": query }))
    }

    async fn get_collection(&self, slug: &str) -> Result<Value, ApiError> {
        Ok(json!({ "slug": slug }))
    }

    async fn list_collections(&self, _cursor: Option<&str>) -> Result<Value, ApiError> {
        Ok(json!({ "results": [] }))
    }
}

/// Configuration equivalent to a fully configured environment
pub fn test_config() -> ServerConfig {
    ServerConfig {
        api: ReplicateApiConfig {
            token: Some("test-token".into()),
            default_version: Some("default-version".into()),
        },
        poll: PollSettings {
            interval_ms: 1,
            max_attempts: None,
        },
    }
}

/// Configuration with no credential
pub fn tokenless_config() -> ServerConfig {
    let mut config = test_config();
    config.api.token = None;
    config
}

/// Registry over a stub gateway with an instant waiter
pub fn registry_with(api: Arc<StubApi>, options: RegistryOptions) -> ToolRegistry {
    ToolRegistry::with_api(Some(api), &test_config(), options).with_waiter(Arc::new(NoopWaiter))
}

/// Registry with no gateway at all (missing credential)
pub fn registry_without_api(options: RegistryOptions) -> ToolRegistry {
    ToolRegistry::with_api(None, &tokenless_config(), options).with_waiter(Arc::new(NoopWaiter))
}

/// Extract the single text block from a tool response
pub fn response_text(response: &replicate_mcp_server::mcp::ToolResponse) -> String {
    assert_eq!(response.content.len(), 1);
    let replicate_mcp_server::mcp::Content::Text { text } = &response.content[0];
    text.clone()
}
