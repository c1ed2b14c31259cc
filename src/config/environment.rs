// ABOUTME: Environment-based server configuration for credentials and poller tuning
// ABOUTME: Loads REPLICATE_* variables once at startup; read-only afterwards
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Server configuration loaded from the process environment.
//!
//! One required credential (`REPLICATE_API_TOKEN`), one optional default
//! model version, and optional poller tuning. Whether a missing credential
//! is fatal depends on the exposure mode and is decided by the binary, not
//! here, so `--list` and dynamic-only operation work without a token.

use crate::errors::{AppError, AppResult};
use replicate_api::PollConfig;
use std::env;
use std::time::Duration;

/// Environment variable holding the API credential
pub const ENV_API_TOKEN: &str = "REPLICATE_API_TOKEN";

/// Environment variable holding the default model version id
pub const ENV_MODEL_VERSION: &str = "REPLICATE_MODEL_VERSION";

/// Environment variable overriding the poll interval, in milliseconds
pub const ENV_POLL_INTERVAL_MS: &str = "REPLICATE_POLL_INTERVAL_MS";

/// Environment variable bounding the poll loop; unset or 0 means unlimited
pub const ENV_POLL_MAX_ATTEMPTS: &str = "REPLICATE_POLL_MAX_ATTEMPTS";

/// Replicate API connection settings
#[derive(Debug, Clone)]
pub struct ReplicateApiConfig {
    /// API credential, absent when the variable is unset or empty
    pub token: Option<String>,
    /// Default model version used when a call supplies none
    pub default_version: Option<String>,
}

/// Poller tuning settings
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Delay between status fetches, in milliseconds
    pub interval_ms: u64,
    /// Maximum status fetches per job, `None` for the unbounded default
    pub max_attempts: Option<u32>,
}

impl PollSettings {
    /// Convert into the poller crate's configuration type
    #[must_use]
    pub const fn to_poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.interval_ms),
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: None,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Replicate API connection settings
    pub api: ReplicateApiConfig,
    /// Poller tuning
    pub poll: PollSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if a poller tuning variable is set but not a
    /// valid number
    pub fn from_env() -> AppResult<Self> {
        let token = env::var(ENV_API_TOKEN).ok().filter(|t| !t.is_empty());
        let default_version = env::var(ENV_MODEL_VERSION).ok().filter(|v| !v.is_empty());

        let interval_ms = match env::var(ENV_POLL_INTERVAL_MS) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::config(format!("{ENV_POLL_INTERVAL_MS} must be a number: {e}"))
            })?,
            Err(_) => PollSettings::default().interval_ms,
        };

        let max_attempts = match env::var(ENV_POLL_MAX_ATTEMPTS) {
            Ok(raw) => {
                let parsed = raw.parse::<u32>().map_err(|e| {
                    AppError::config(format!("{ENV_POLL_MAX_ATTEMPTS} must be a number: {e}"))
                })?;
                (parsed > 0).then_some(parsed)
            }
            Err(_) => None,
        };

        Ok(Self {
            api: ReplicateApiConfig {
                token,
                default_version,
            },
            poll: PollSettings {
                interval_ms,
                max_attempts,
            },
        })
    }

    /// One-line startup summary, with the credential redacted
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "token={}, default_version={}, poll_interval={}ms, poll_max_attempts={}",
            if self.api.token.is_some() {
                "configured"
            } else {
                "missing"
            },
            self.api.default_version.as_deref().unwrap_or("none"),
            self.poll.interval_ms,
            self.poll
                .max_attempts
                .map_or_else(|| "unlimited".to_owned(), |n| n.to_string()),
        )
    }
}
