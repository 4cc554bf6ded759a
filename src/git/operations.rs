//! Git clone operations
//!
//! Clones repositories over HTTPS with the configured credential and sets
//! local identity configuration on the resulting working copy. The token
//! is supplied through a credential callback, never embedded in the remote
//! URL, and every error leaving this module is scrubbed of the literal
//! token text.

use crate::git::redact;
use crate::{HubkitError, Result};
use git2::{Cred, FetchOptions, RemoteCallbacks, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options forwarded to a clone
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Branch to check out instead of the remote default
    pub branch: Option<String>,

    /// Shallow-clone depth
    pub depth: Option<i32>,
}

/// A cloned working copy: the repository handle and its resolved path
pub struct CloneHandle {
    pub repo: Repository,
    pub path: PathBuf,
}

impl std::fmt::Debug for CloneHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloneHandle")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Git facade carrying the resolved identity and credential
#[derive(Debug)]
pub struct GitOps {
    login: Option<String>,
    token: Option<String>,
}

impl GitOps {
    pub fn new(login: Option<String>, token: Option<String>) -> Self {
        Self { login, token }
    }

    /// Create the credential callback for fetch operations
    fn create_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();

        let token = self.token.clone();
        let login = self.login.clone();

        callbacks.credentials(move |_url, username_from_url, _allowed_types| {
            if let Some(ref token) = token {
                let user = login.as_deref().or(username_from_url).unwrap_or("x-access-token");
                return Cred::userpass_plaintext(user, token);
            }

            // Anonymous access for public repositories
            Cred::default()
        });

        callbacks
    }

    /// Clone `org/repo` into `dest_dir/repo`
    ///
    /// Sets `user.name` and `user.email` on the working copy when an
    /// identity is known, so follow-on commits are attributed correctly.
    pub fn clone(
        &self,
        org: &str,
        repo: &str,
        dest_dir: &Path,
        options: &CloneOptions,
    ) -> Result<CloneHandle> {
        debug!(org = %org, repo = %repo, dest = %dest_dir.display(), "cloning repository");

        fs::create_dir_all(dest_dir)?;

        let url = format!("https://github.com/{}/{}.git", org, repo);
        let target = dest_dir.join(repo);

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.create_callbacks());
        if let Some(depth) = options.depth {
            fetch_options.depth(depth);
        }

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_options);
        if let Some(ref branch) = options.branch {
            builder.branch(branch);
        }

        let repository = builder
            .clone(&url, &target)
            .map_err(|e| self.scrubbed(format!("clone of {}/{} failed: {}", org, repo, e)))?;

        if let Some(ref login) = self.login {
            self.configure_identity(&repository, login)
                .map_err(|e| self.scrubbed(format!("identity config failed: {}", e)))?;
        }

        debug!(path = %target.display(), "repository cloned");

        Ok(CloneHandle {
            repo: repository,
            path: target,
        })
    }

    fn configure_identity(
        &self,
        repository: &Repository,
        login: &str,
    ) -> std::result::Result<(), git2::Error> {
        let mut config = repository.config()?;
        config.set_str("user.name", login)?;
        config.set_str("user.email", &format!("{}@github.com", login))?;
        Ok(())
    }

    /// Redaction boundary: all error text leaving the git layer passes
    /// through here
    fn scrubbed(&self, message: String) -> HubkitError {
        HubkitError::Git(redact::scrub(&message, self.token.as_deref()))
    }

    /// Remove a single cloned working directory
    pub fn remove_clone(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "removing cloned repo");
        fs::remove_dir_all(path)?;
        Ok(())
    }

    /// Remove every given working directory, best-effort
    ///
    /// Each path is attempted; failures are collected into one aggregated
    /// error rather than stopping at the first.
    pub fn remove_all_clones(&self, paths: &[PathBuf]) -> Result<()> {
        debug!(count = paths.len(), "removing all cloned repos");

        let mut failures = Vec::new();
        for path in paths {
            if let Err(e) = self.remove_clone(path) {
                warn!(path = %path.display(), error = %e, "failed to remove cloned repo");
                failures.push(format!("{}: {}", path.display(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HubkitError::RemoveClones(failures.join("; ")))
        }
    }
}
