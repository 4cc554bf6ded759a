//! GitHub REST API layer
//!
//! A typed, configured REST client plus the payload types for the issue
//! operations the facade forwards. Pagination and transient-failure retry
//! live here, not in the facade.

pub mod client;
pub mod retry;
pub mod types;

pub use client::GitHubClient;
pub use retry::{RetryConfig, RetryDecision, RetryableError};
pub use types::{CloseOptions, Comment, Issue, Label, User};
