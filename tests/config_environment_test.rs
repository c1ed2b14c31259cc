// ABOUTME: Unit tests for environment-based configuration loading
// ABOUTME: Credential presence, poller tuning parsing, and summary redaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use replicate_mcp_server::config::environment::{
    ServerConfig, ENV_API_TOKEN, ENV_MODEL_VERSION, ENV_POLL_INTERVAL_MS, ENV_POLL_MAX_ATTEMPTS,
};
use replicate_mcp_server::errors::ErrorCode;
use serial_test::serial;
use std::env;

fn clear_env() {
    env::remove_var(ENV_API_TOKEN);
    env::remove_var(ENV_MODEL_VERSION);
    env::remove_var(ENV_POLL_INTERVAL_MS);
    env::remove_var(ENV_POLL_MAX_ATTEMPTS);
}

#[test]
#[serial]
fn defaults_when_nothing_is_set() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();
    assert!(config.api.token.is_none());
    assert!(config.api.default_version.is_none());
    assert_eq!(config.poll.interval_ms, 1000);
    assert!(config.poll.max_attempts.is_none());
}

#[test]
#[serial]
fn loads_all_configured_values() {
    clear_env();
    env::set_var(ENV_API_TOKEN, "r8_secret");
    env::set_var(ENV_MODEL_VERSION, "abc123");
    env::set_var(ENV_POLL_INTERVAL_MS, "250");
    env::set_var(ENV_POLL_MAX_ATTEMPTS, "30");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.api.token.as_deref(), Some("r8_secret"));
    assert_eq!(config.api.default_version.as_deref(), Some("abc123"));
    assert_eq!(config.poll.interval_ms, 250);
    assert_eq!(config.poll.max_attempts, Some(30));

    clear_env();
}

#[test]
#[serial]
fn empty_token_counts_as_missing() {
    clear_env();
    env::set_var(ENV_API_TOKEN, "");

    let config = ServerConfig::from_env().unwrap();
    assert!(config.api.token.is_none());

    clear_env();
}

#[test]
#[serial]
fn zero_max_attempts_means_unlimited() {
    clear_env();
    env::set_var(ENV_POLL_MAX_ATTEMPTS, "0");

    let config = ServerConfig::from_env().unwrap();
    assert!(config.poll.max_attempts.is_none());

    clear_env();
}

#[test]
#[serial]
fn non_numeric_tuning_is_a_config_error() {
    clear_env();
    env::set_var(ENV_POLL_INTERVAL_MS, "fast");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains(ENV_POLL_INTERVAL_MS));

    clear_env();
}

#[test]
#[serial]
fn summary_never_contains_the_credential() {
    clear_env();
    env::set_var(ENV_API_TOKEN, "r8_secret");

    let config = ServerConfig::from_env().unwrap();
    let summary = config.summary();
    assert!(summary.contains("token=configured"));
    assert!(!summary.contains("r8_secret"));

    clear_env();
}
