//! hubkit - Convenience toolkit for GitHub automation inside CI workflows
//!
//! hubkit hydrates repository, credential, and issue context from the
//! workflow environment and event payload, then exposes short-hand issue,
//! label, comment, and clone operations with that context pre-filled.
//!
//! # Architecture
//!
//! - **config**: explicit configuration struct with env resolution
//! - **context**: the org/repo pair and its derived slug
//! - **event**: workflow event payload hydration
//! - **github**: typed REST client (auth, pagination, retry)
//! - **git**: clone operations, clone registry, token redaction
//! - **hub**: the facade root composing the layers
//!
//! # Example
//!
//! ```no_run
//! use hubkit::Hubkit;
//!
//! # async fn run() -> hubkit::Result<()> {
//! let gh = Hubkit::from_env().await?;
//! gh.add_labels(&["in-progress".to_string()], None).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod git;
pub mod github;
pub mod hub;
pub mod logging;

// Re-exports
pub use config::{Config, CredentialMode};
pub use context::RepoContext;
pub use error::{HubkitError, Result};
pub use event::{EventPayload, EventState};
pub use git::{CloneHandle, CloneOptions, CloneRegistry};
pub use github::{CloseOptions, Comment, GitHubClient, Issue, Label, User};
pub use hub::Hubkit;
