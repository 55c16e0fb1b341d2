//! Error types for greenhouse-core.
//!
//! All errors here come from talking to the gateway. The history tracker
//! itself never fails: every per-sensor problem becomes that sensor's error
//! flag (see [`crate::history`]).
//!
//! # Retry Strategy
//!
//! | Error Type | Retry? | Rationale |
//! |------------|--------|-----------|
//! | [`Error::NotReachable`] | Yes | Gateway restarting or network blip |
//! | [`Error::Timeout`] | Yes | Transient congestion |
//! | [`Error::Api`] with status >= 500 | Yes | Gateway-side failure |
//! | [`Error::Api`] with status < 500 | No | The request itself was rejected |
//! | [`Error::InvalidResponse`] | No | Payload will not fix itself |
//! | [`Error::InvalidUrl`] | No | Fix configuration and restart |
//! | [`Error::InvalidCommand`] | No | Value outside the actuator range |
//!
//! Only sensor fetches are retried; actuator commands are sent once so a
//! set point is never applied twice.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the greenhouse gateway.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The gateway did not answer at all.
    #[error("Gateway not reachable at {url}: {source}")]
    NotReachable {
        /// The URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client failure that is not a connection problem.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured base URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The gateway answered with a non-success status.
    #[error("Gateway error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The gateway's `detail` message, or a fallback.
        message: String,
    },

    /// The gateway answered 2xx but the body could not be decoded.
    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),

    /// A request exceeded the configured timeout.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// An actuator command failed validation before being sent.
    #[error(transparent)]
    InvalidCommand(#[from] greenhouse_types::ParseError),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::NotReachable { .. } | Error::Timeout { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            Error::Request(e) => e.is_connect() || e.is_timeout(),
            Error::InvalidUrl(_) | Error::InvalidResponse(_) | Error::InvalidCommand(_) => false,
        }
    }

    /// Short message suitable for a status line.
    ///
    /// For API errors this is the gateway's own detail text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using greenhouse-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
