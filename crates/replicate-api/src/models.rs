// ABOUTME: Job models and request payloads for the Replicate API
// ABOUTME: Typed views over prediction/training bodies with passthrough of undeclared fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote job status.
///
/// The vocabulary (`starting`, `processing`, `succeeded`, `failed`,
/// `canceled`) is owned by the Replicate API, not by this crate, so the
/// status is kept as an opaque string with predicates over the values the
/// poller needs to recognize. Unknown values are treated as in-progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStatus(pub String);

impl JobStatus {
    /// Status string for a successfully finished job
    pub const SUCCEEDED: &'static str = "succeeded";
    /// Status string for a failed job
    pub const FAILED: &'static str = "failed";
    /// Status string for a canceled job
    pub const CANCELED: &'static str = "canceled";

    /// Job finished and produced output
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.0 == Self::SUCCEEDED
    }

    /// Job finished with an error
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.0 == Self::FAILED
    }

    /// Job was canceled before finishing
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.0 == Self::CANCELED
    }

    /// Job reached any terminal state
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_succeeded() || self.is_failed() || self.is_canceled()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An asynchronous remote job (prediction or training).
///
/// Both resources share the same lifecycle shape on the wire: an opaque id,
/// a status, output once succeeded, and an error once failed. Fields this
/// crate does not interpret (urls, metrics, logs, version info) are kept in
/// `extra` so responses round-trip to callers unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque id assigned by the remote API
    pub id: String,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Present only once the job succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// Present only once the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Creation timestamp reported by the remote API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Completion timestamp, set once terminal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Remaining response fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Upstream error text, if the error field is a string or serializes
    /// to something readable.
    #[must_use]
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(|e| match e {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Payload for `POST /predictions`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    /// Model version id to run; the remote API resolves defaults when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `owner/name` model identifier, alternative to `version`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Model input parameters, forwarded as-is
    pub input: Value,
}

/// Payload for `POST /trainings`.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingRequest {
    /// Base model version id to train from
    pub version: String,
    /// `owner/name` of the model that will receive the trained version
    pub destination: String,
    /// Training input parameters, forwarded as-is
    pub input: Value,
}
