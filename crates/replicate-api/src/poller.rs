// ABOUTME: Poll-until-terminal loop for asynchronous Replicate jobs
// ABOUTME: Explicit state machine with injected waiter so tests run without real delays
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::client::ReplicateApi;
use crate::errors::PollError;
use crate::models::Job;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Default delay between status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cooperative suspension between polls.
///
/// The production implementation delegates to the tokio timer; tests inject
/// a counting stub so many iterations run without wall-clock delay. A waiter
/// must never block the thread, only the task.
#[async_trait]
pub trait Waiter: Send + Sync {
    /// Suspend the current task for `interval`
    async fn wait(&self, interval: Duration);
}

/// [`Waiter`] backed by `tokio::time::sleep`
pub struct TokioWaiter;

#[async_trait]
impl Waiter for TokioWaiter {
    async fn wait(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Which job resource a poll loop is observing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// An inference job under `/predictions`
    Prediction,
    /// A model-fitting job under `/trainings`
    Training,
}

impl JobKind {
    /// Error text used when a failed job carries no upstream error field
    #[must_use]
    pub const fn placeholder_error(self) -> &'static str {
        match self {
            Self::Prediction => "prediction failed",
            Self::Training => "training failed",
        }
    }
}

/// Poll loop tuning.
///
/// `max_attempts: None` preserves the original unbounded-wait behavior: the
/// loop runs until a terminal status arrives or the process is terminated.
/// Callers wanting bounded latency set a budget or layer a deadline on top.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status fetches
    pub interval: Duration,
    /// Maximum number of status fetches, `None` for no limit
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Observes one remote job until it reaches a terminal state.
///
/// The lifecycle is `submitted -> polling -> {succeeded | failed | canceled}`.
/// Each cycle fetches the job via the gateway; any in-progress status
/// (`starting`, `processing`, or vocabulary this crate does not know) stays
/// in `polling`. The loop itself never mutates job state: cancellation is a
/// separate explicit gateway call and does not stop a loop already in
/// flight, mirroring the remote API's decoupling of job state from pollers.
pub struct JobPoller<'a> {
    api: &'a dyn ReplicateApi,
    waiter: &'a dyn Waiter,
    config: PollConfig,
}

impl<'a> JobPoller<'a> {
    /// Poller with default tuning (1 second interval, no attempt limit)
    #[must_use]
    pub fn new(api: &'a dyn ReplicateApi, waiter: &'a dyn Waiter) -> Self {
        Self::with_config(api, waiter, PollConfig::default())
    }

    /// Poller with explicit tuning
    #[must_use]
    pub const fn with_config(
        api: &'a dyn ReplicateApi,
        waiter: &'a dyn Waiter,
        config: PollConfig,
    ) -> Self {
        Self { api, waiter, config }
    }

    /// Poll `id` until terminal, returning the succeeded job.
    ///
    /// # Errors
    /// Returns [`PollError::Failed`] or [`PollError::Canceled`] for the two
    /// failure outcomes, [`PollError::Api`] if a status fetch fails, and
    /// [`PollError::AttemptsExhausted`] when a configured attempt budget
    /// runs out first.
    pub async fn wait_until_terminal(&self, kind: JobKind, id: &str) -> Result<Job, PollError> {
        let mut attempts: u32 = 0;
        loop {
            let job = match kind {
                JobKind::Prediction => self.api.get_prediction(id).await?,
                JobKind::Training => self.api.get_training(id).await?,
            };
            attempts += 1;

            if job.status.is_succeeded() {
                debug!("job {id} succeeded after {attempts} status checks");
                return Ok(job);
            }
            if job.status.is_failed() {
                return Err(PollError::Failed {
                    id: id.to_owned(),
                    message: job
                        .error_text()
                        .unwrap_or_else(|| kind.placeholder_error().to_owned()),
                });
            }
            if job.status.is_canceled() {
                return Err(PollError::Canceled { id: id.to_owned() });
            }

            if let Some(max) = self.config.max_attempts {
                if attempts >= max {
                    return Err(PollError::AttemptsExhausted {
                        id: id.to_owned(),
                        attempts,
                    });
                }
            }

            self.waiter.wait(self.config.interval).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use crate::models::{JobStatus, PredictionRequest, TrainingRequest};
    use serde_json::Value;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Waiter that counts calls instead of sleeping
    struct CountingWaiter {
        waits: AtomicU32,
    }

    impl CountingWaiter {
        fn new() -> Self {
            Self {
                waits: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Waiter for CountingWaiter {
        async fn wait(&self, _interval: Duration) {
            self.waits.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Gateway stub that serves a scripted sequence of statuses
    struct ScriptedApi {
        statuses: Mutex<Vec<Job>>,
        gets: AtomicU32,
    }

    impl ScriptedApi {
        fn new(mut script: Vec<Job>) -> Self {
            script.reverse();
            Self {
                statuses: Mutex::new(script),
                gets: AtomicU32::new(0),
            }
        }

        fn job(status: &str, error: Option<Value>) -> Job {
            Job {
                id: "job-1".into(),
                status: JobStatus(status.into()),
                output: status
                    .eq("succeeded")
                    .then(|| serde_json::json!(["https://example/img.png"])),
                error,
                created_at: None,
                completed_at: None,
                extra: serde_json::Map::new(),
            }
        }
    }

    fn not_stubbed() -> ApiError {
        ApiError::Transport {
            message: "not stubbed".into(),
        }
    }

    #[async_trait]
    impl ReplicateApi for ScriptedApi {
        async fn create_prediction(&self, _: &PredictionRequest) -> Result<Job, ApiError> {
            Err(not_stubbed())
        }
        async fn get_prediction(&self, _id: &str) -> Result<Job, ApiError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.statuses.lock().unwrap().pop().ok_or_else(not_stubbed)
        }
        async fn cancel_prediction(&self, _: &str) -> Result<Job, ApiError> {
            Err(not_stubbed())
        }
        async fn list_predictions(&self, _: Option<&str>) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
        async fn create_training(&self, _: &TrainingRequest) -> Result<Job, ApiError> {
            Err(not_stubbed())
        }
        async fn get_training(&self, id: &str) -> Result<Job, ApiError> {
            self.get_prediction(id).await
        }
        async fn cancel_training(&self, _: &str) -> Result<Job, ApiError> {
            Err(not_stubbed())
        }
        async fn list_trainings(&self, _: Option<&str>) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
        async fn get_model(&self, _: &str, _: &str) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
        async fn list_models(&self, _: Option<&str>) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
        async fn search_models(&self, _: &str) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
        async fn get_collection(&self, _: &str) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
        async fn list_collections(&self, _: Option<&str>) -> Result<Value, ApiError> {
            Err(not_stubbed())
        }
    }

    #[tokio::test]
    async fn stops_on_first_terminal_status() {
        let api = ScriptedApi::new(vec![ScriptedApi::job("succeeded", None)]);
        let waiter = CountingWaiter::new();
        let poller = JobPoller::new(&api, &waiter);

        let job = poller
            .wait_until_terminal(JobKind::Prediction, "job-1")
            .await
            .unwrap();

        assert_eq!(
            job.output,
            Some(serde_json::json!(["https://example/img.png"]))
        );
        assert_eq!(api.gets.load(Ordering::SeqCst), 1);
        // No wait after a terminal state is observed
        assert_eq!(waiter.waits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn polls_through_in_progress_statuses_until_failed() {
        let api = ScriptedApi::new(vec![
            ScriptedApi::job("processing", None),
            ScriptedApi::job("processing", None),
            ScriptedApi::job("processing", None),
            ScriptedApi::job("failed", Some(Value::String("boom".into()))),
        ]);
        let waiter = CountingWaiter::new();
        let poller = JobPoller::new(&api, &waiter);

        let err = poller
            .wait_until_terminal(JobKind::Prediction, "job-1")
            .await
            .unwrap_err();

        assert_eq!(api.gets.load(Ordering::SeqCst), 4);
        assert_eq!(waiter.waits.load(Ordering::SeqCst), 3);
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn canceled_is_a_terminal_failure() {
        let api = ScriptedApi::new(vec![ScriptedApi::job("canceled", None)]);
        let waiter = CountingWaiter::new();
        let poller = JobPoller::new(&api, &waiter);

        let err = poller
            .wait_until_terminal(JobKind::Training, "job-1")
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Canceled { .. }));
    }

    #[tokio::test]
    async fn failed_without_error_field_uses_placeholder() {
        let api = ScriptedApi::new(vec![ScriptedApi::job("failed", None)]);
        let waiter = CountingWaiter::new();
        let poller = JobPoller::new(&api, &waiter);

        let err = poller
            .wait_until_terminal(JobKind::Training, "job-1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("training failed"));
    }

    #[tokio::test]
    async fn attempt_budget_bounds_the_loop() {
        let api = ScriptedApi::new(vec![
            ScriptedApi::job("starting", None),
            ScriptedApi::job("processing", None),
            ScriptedApi::job("processing", None),
        ]);
        let waiter = CountingWaiter::new();
        let poller = JobPoller::with_config(
            &api,
            &waiter,
            PollConfig {
                interval: Duration::from_millis(1),
                max_attempts: Some(2),
            },
        );

        let err = poller
            .wait_until_terminal(JobKind::Prediction, "job-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PollError::AttemptsExhausted { attempts: 2, .. }
        ));
        assert_eq!(api.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gateway_error_aborts_the_loop() {
        // Script runs dry -> the next get returns a transport error
        let api = ScriptedApi::new(vec![ScriptedApi::job("processing", None)]);
        let waiter = CountingWaiter::new();
        let poller = JobPoller::new(&api, &waiter);

        let err = poller
            .wait_until_terminal(JobKind::Prediction, "job-1")
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Api(_)));
    }
}
