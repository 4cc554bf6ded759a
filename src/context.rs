//! Repository context
//!
//! The org/repo pair every facade operation is scoped to. The `org/repo`
//! slug is computed on read, so there is no cached join to keep in sync
//! when either field changes.

use crate::{HubkitError, Result};
use std::fmt;

/// The repository a facade instance operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    org: String,
    repo: String,
}

impl RepoContext {
    /// Create a context from explicit org and repo
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
        }
    }

    /// Parse an `org/repo` slug, splitting on the first `/`
    pub fn from_slug(slug: &str) -> Result<Self> {
        match slug.split_once('/') {
            Some((org, repo)) if !org.is_empty() && !repo.is_empty() => {
                Ok(Self::new(org, repo))
            }
            _ => Err(HubkitError::Config(format!(
                "invalid repository slug: {:?} (expected org/repo)",
                slug
            ))),
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// The `org/repo` slug, derived from the current fields
    pub fn slug(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    pub fn set_org(&mut self, org: impl Into<String>) {
        self.org = org.into();
    }

    pub fn set_repo(&mut self, repo: impl Into<String>) {
        self.repo = repo.into();
    }
}

impl fmt::Display for RepoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}
