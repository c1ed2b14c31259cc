// ABOUTME: Replicate HTTP API client crate with job models and asynchronous polling
// ABOUTME: Core gateway trait, reqwest-backed client, and the poll-until-terminal loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replicate HTTP API integration.
//!
//! This crate provides the gateway to `https://api.replicate.com/v1`: one
//! method per (resource, operation) pair, typed job models for predictions
//! and trainings, and a poller that observes an asynchronous job until it
//! reaches a terminal state.

/// Reqwest-backed API gateway bound to one base URL and one credential
pub mod client;
/// Gateway and poller error types
pub mod errors;
/// Job and request payload models
pub mod models;
/// Poll-until-terminal loop for asynchronous jobs
pub mod poller;

pub use client::{ReplicateApi, ReplicateClient, DEFAULT_BASE_URL};
pub use errors::{ApiError, PollError};
pub use models::{Job, JobStatus, PredictionRequest, TrainingRequest};
pub use poller::{JobKind, JobPoller, PollConfig, TokioWaiter, Waiter};
