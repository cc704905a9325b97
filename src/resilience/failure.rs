//! Failure taxonomy for wrapped operations.
//!
//! The boundary that performs the actual I/O builds one of these variants;
//! the invoker only ever matches on the variant tag.

use std::time::Duration;
use thiserror::Error;

/// Closed set of failures an operation can report to the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Transport could not complete (connect refused, reset, DNS, ...).
    #[error("network error: {message}")]
    Network { message: String },

    /// Remote answered with an HTTP status.
    #[error("HTTP status {code}: {message}")]
    HttpStatus { code: u16, message: String },

    /// Attempt exceeded an externally enforced deadline.
    #[error("{}", timeout_message(.after))]
    Timeout { after: Option<Duration> },

    /// Caller cancelled the invocation.
    #[error("operation cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{message}")]
    Other { message: String },
}

impl Failure {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    pub fn http(code: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus { code, message: message.into() }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after: Some(after) }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other { message: message.into() }
    }

    /// HTTP status code, if this failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::HttpStatus { .. } => "http_status",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Other { .. } => "other",
        }
    }

    /// One-line description reported to observers.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

fn timeout_message(after: &Option<Duration>) -> String {
    match after {
        Some(d) => format!("timed out after {} ms", d.as_millis()),
        None => "timed out".to_string(),
    }
}

/// Result type for resilient invocations.
pub type InvokeResult<T> = Result<T, Failure>;
