// ABOUTME: Error types for the Replicate API gateway and job poller
// ABOUTME: Distinguishes upstream HTTP failures, transport failures, and terminal job failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Failure of a single gateway round trip.
///
/// Each gateway method performs exactly one HTTP request, so every variant
/// maps to one observable outcome of that round trip. Retry and backoff are
/// not handled here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream returned a non-2xx status. `detail` carries the structured
    /// `detail`/`title` field from the response body when present, otherwise
    /// the raw body text.
    #[error("Replicate API error (HTTP {status}): {detail}")]
    Http {
        /// Upstream HTTP status code
        status: u16,
        /// Upstream-provided detail message
        detail: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, connect,
    /// timeout). The message is the transport error's own text.
    #[error("transport error: {message}")]
    Transport {
        /// Transport error text
        message: String,
    },

    /// A 2xx response body could not be parsed as JSON.
    #[error("failed to decode Replicate API response: {message}")]
    Decode {
        /// Decode error text
        message: String,
    },

    /// The configured API base URL is not a usable absolute URL.
    #[error("invalid API base URL: {message}")]
    BaseUrl {
        /// Parse error text
        message: String,
    },
}

impl ApiError {
    /// Upstream HTTP status, when the failure carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } | Self::BaseUrl { .. } => None,
        }
    }
}

/// Terminal outcome of the poll loop, when the outcome is not success.
#[derive(Debug, Error)]
pub enum PollError {
    /// A status fetch failed; the loop does not retry past gateway errors.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The job reached the `failed` status. `message` is the upstream error
    /// field, or a fixed placeholder when the upstream omitted it.
    #[error("job {id} failed: {message}")]
    Failed {
        /// Remote job id
        id: String,
        /// Upstream error text or placeholder
        message: String,
    },

    /// The job reached the `canceled` status; treated as a failure.
    #[error("job {id} was canceled")]
    Canceled {
        /// Remote job id
        id: String,
    },

    /// The configured attempt budget ran out before a terminal status.
    /// Only possible when `PollConfig::max_attempts` is set.
    #[error("job {id} still running after {attempts} status checks")]
    AttemptsExhausted {
        /// Remote job id
        id: String,
        /// Number of status fetches performed
        attempts: u32,
    },
}
