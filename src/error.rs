//! Error types for hubkit
//!
//! Defines one error enum covering every failure mode in the crate.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for hubkit operations
pub type Result<T> = std::result::Result<T, HubkitError>;

/// Error type for hubkit operations
#[derive(Error, Debug)]
pub enum HubkitError {
    /// Configuration errors (missing credential in strict mode, unresolvable
    /// org/repo, no issue number available)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failures reported by the API
    #[error("Authentication error: {0}")]
    Auth(String),

    /// API responses that are neither success nor a more specific case
    #[error("GitHub API error: {0}")]
    Api(String),

    /// A requested resource does not exist (issue, label, ...)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited, retry after the given number of seconds
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Git operation errors with scrubbed message text
    #[error("Git error: {0}")]
    Git(String),

    /// A path that was never recorded as a clone of this process
    #[error("not a cloned repository: {0}")]
    CloneRegistry(String),

    /// Aggregated failures from a best-effort clone cleanup
    #[error("failed to remove cloned repos: {0}")]
    RemoveClones(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Git2 library errors that carry no credential material
    #[error("Git library error: {0}")]
    Git2(#[from] git2::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl crate::github::retry::RetryableError for HubkitError {
    fn retry_decision(&self) -> crate::github::retry::RetryDecision {
        use crate::github::retry::RetryDecision;
        use std::time::Duration;

        match self {
            HubkitError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    RetryDecision::Retry
                } else {
                    RetryDecision::NoRetry
                }
            }
            HubkitError::RateLimited(secs) => {
                RetryDecision::RetryAfter(Duration::from_secs(*secs))
            }
            // Server-side failures surface as Api messages carrying the status
            HubkitError::Api(msg) if msg.contains("HTTP 5") => RetryDecision::Retry,
            _ => RetryDecision::NoRetry,
        }
    }
}
