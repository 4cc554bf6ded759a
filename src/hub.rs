//! Facade root
//!
//! Composes configuration, the REST client, the git layer, and the
//! hydrated workflow event into one handle with the repository context
//! pre-filled. Construction order is fixed: resolve environment, resolve
//! credential, construct the API client, resolve identity, construct the
//! git facade, hydrate the event, resolve the issue number.

use crate::config::{Config, CredentialMode};
use crate::context::RepoContext;
use crate::error::{HubkitError, Result};
use crate::event::{self, EventState};
use crate::git::{CloneHandle, CloneOptions, CloneRegistry, GitOps};
use crate::github::{CloseOptions, Comment, GitHubClient, Issue, Label};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// GitHub automation facade with auto-hydrated workflow context
#[derive(Debug)]
pub struct Hubkit {
    context: RepoContext,
    login: Option<String>,
    sha: Option<String>,
    client: GitHubClient,
    git: GitOps,
    event: EventState,
    issue_number: Option<u64>,
    registry: CloneRegistry,
}

impl Hubkit {
    /// Construct a facade from the process environment
    pub async fn from_env() -> Result<Self> {
        Self::new(Config::from_env()).await
    }

    /// Construct a facade from resolved configuration
    pub async fn new(config: Config) -> Result<Self> {
        let context = match (&config.org, &config.repo) {
            (Some(org), Some(repo)) => RepoContext::new(org.clone(), repo.clone()),
            _ => {
                return Err(HubkitError::Config(
                    "could not resolve org/repo: pass them explicitly or set GITHUB_REPOSITORY"
                        .to_string(),
                ))
            }
        };

        if config.token.is_none() {
            match config.credential_mode {
                CredentialMode::Strict => {
                    return Err(HubkitError::Config(
                        "no GitHub token found (set HUBKIT_ACCESS_TOKEN or GITHUB_TOKEN)"
                            .to_string(),
                    ))
                }
                CredentialMode::Lenient => {
                    warn!("no GitHub token found, API access is anonymous and rate-limited");
                }
            }
        }

        let client = GitHubClient::new(&config)?;

        // the client, not the facade, knows who the credential belongs to
        let login = match (&config.login, &config.token) {
            (Some(login), _) => Some(login.clone()),
            (None, Some(_)) => match client.authenticated_user().await {
                Ok(user) => Some(user.login),
                Err(e) => {
                    warn!(error = %e, "could not resolve authenticated login");
                    None
                }
            },
            (None, None) => None,
        };

        let git = GitOps::new(login.clone(), config.token.clone());

        let event = event::hydrate(config.ci, config.event_path.as_deref());
        let issue_number = event.issue_number();

        debug!(
            login = ?login,
            org = %context.org(),
            repo = %context.repo(),
            issue_number = ?issue_number,
            "hubkit initialized"
        );

        Ok(Self {
            context,
            login,
            sha: config.sha,
            client,
            git,
            event,
            issue_number,
            registry: CloneRegistry::new(),
        })
    }

    pub fn org(&self) -> &str {
        self.context.org()
    }

    pub fn repo(&self) -> &str {
        self.context.repo()
    }

    /// The `org/repo` slug, derived from the current context
    pub fn slug(&self) -> String {
        self.context.slug()
    }

    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    pub fn sha(&self) -> Option<&str> {
        self.sha.as_deref()
    }

    /// The auto-hydrated issue/PR number, if the event carried one
    pub fn issue_number(&self) -> Option<u64> {
        self.issue_number
    }

    /// Outcome of event hydration, including the parsed payload
    pub fn event(&self) -> &EventState {
        &self.event
    }

    /// The underlying REST client, for operations the facade does not
    /// short-hand
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Point the facade at a different repository in the same org
    pub fn set_repo(&mut self, repo: impl Into<String>) {
        self.context.set_repo(repo);
        debug!("updated org/repo: {}", self.context.slug());
    }

    /// Point the facade at a different organization
    pub fn set_org(&mut self, org: impl Into<String>) {
        self.context.set_org(org);
        debug!("updated org/repo: {}", self.context.slug());
    }

    /// Clone the facade's current repository into `dest_dir/repo`
    pub fn clone_repo(
        &mut self,
        dest_dir: impl AsRef<Path>,
        options: &CloneOptions,
    ) -> Result<CloneHandle> {
        let org = self.context.org().to_string();
        let repo = self.context.repo().to_string();
        self.clone_repo_from(&org, &repo, dest_dir, options)
    }

    /// Clone an arbitrary repository into `dest_dir/repo`, recording the
    /// working directory in the clone registry
    pub fn clone_repo_from(
        &mut self,
        org: &str,
        repo: &str,
        dest_dir: impl AsRef<Path>,
        options: &CloneOptions,
    ) -> Result<CloneHandle> {
        let mut handle = self.git.clone(org, repo, dest_dir.as_ref(), options)?;
        handle.path = self.registry.record(&handle.path);
        Ok(handle)
    }

    /// Remove one cloned working directory
    ///
    /// The path must match a registry entry (any spelling that normalizes
    /// to it); unrecorded paths fail without touching the filesystem.
    pub fn remove_clone(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let stored = self
            .registry
            .find(path)
            .ok_or_else(|| HubkitError::CloneRegistry(path.display().to_string()))?;
        self.git.remove_clone(&stored)?;
        self.registry.remove(&stored)?;
        Ok(())
    }

    /// Remove every registered clone, best-effort
    ///
    /// Failures do not stop the sweep; paths that could not be removed
    /// stay registered and are reported in one aggregated error.
    pub fn remove_all_clones(&mut self) -> Result<()> {
        debug!("removing all cloned repos");

        let mut failures = Vec::new();
        for path in self.registry.paths().to_vec() {
            match self.git.remove_clone(&path) {
                Ok(()) => {
                    self.registry.remove(&path)?;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove cloned repo");
                    failures.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HubkitError::RemoveClones(failures.join("; ")))
        }
    }

    /// Read-only view of the working directories cloned by this instance
    pub fn cloned_repos(&self) -> &[PathBuf] {
        self.registry.paths()
    }

    fn resolve_issue_number(&self, explicit: Option<u64>) -> Result<u64> {
        explicit.or(self.issue_number).ok_or_else(|| {
            HubkitError::Config(
                "no issue number: pass one explicitly or run from an issue/pull_request event"
                    .to_string(),
            )
        })
    }

    /// Add labels to an issue or pull request
    pub async fn add_labels(
        &self,
        labels: &[String],
        issue_number: Option<u64>,
    ) -> Result<Vec<Label>> {
        let number = self.resolve_issue_number(issue_number)?;
        self.client.add_labels(&self.slug(), number, labels).await
    }

    /// Remove labels from an issue or pull request
    ///
    /// Each label is removed independently: a label that does not exist on
    /// the issue is logged as a warning and the loop continues, so removing
    /// `[a, b, c]` where `b` is absent still removes `a` and `c`.
    pub async fn remove_labels(&self, labels: &[String], issue_number: Option<u64>) -> Result<()> {
        let number = self.resolve_issue_number(issue_number)?;
        debug!(labels = ?labels, number = number, "removing labels");

        for label in labels {
            match self.client.remove_label(&self.slug(), number, label).await {
                Ok(()) => {}
                Err(HubkitError::NotFound(_)) => {
                    warn!("label: {} not found on issue: {}", label, number);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// List the labels currently on an issue or pull request
    pub async fn issue_labels(&self, issue_number: Option<u64>) -> Result<Vec<Label>> {
        let number = self.resolve_issue_number(issue_number)?;
        self.client.list_issue_labels(&self.slug(), number).await
    }

    /// Add a comment to an issue or pull request
    pub async fn add_comment(&self, body: &str, issue_number: Option<u64>) -> Result<Comment> {
        let number = self.resolve_issue_number(issue_number)?;
        self.client.add_comment(&self.slug(), number, body).await
    }

    /// Close an issue
    pub async fn close_issue(
        &self,
        options: &CloseOptions,
        issue_number: Option<u64>,
    ) -> Result<Issue> {
        let number = self.resolve_issue_number(issue_number)?;
        self.client.close_issue(&self.slug(), number, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_hub(issue_number: Option<u64>) -> Hubkit {
        let config = Config::default().with_token("test-token");
        Hubkit {
            context: RepoContext::new("github", "octocat"),
            login: Some("hubot".to_string()),
            sha: None,
            client: GitHubClient::new(&config).unwrap(),
            git: GitOps::new(Some("hubot".to_string()), Some("test-token".to_string())),
            event: EventState::NotCi,
            issue_number,
            registry: CloneRegistry::new(),
        }
    }

    #[test]
    fn test_slug_tracks_setters() {
        let mut hub = bare_hub(None);
        assert_eq!(hub.slug(), "github/octocat");

        hub.set_repo("test");
        assert_eq!(hub.slug(), "github/test");

        let mut hub = bare_hub(None);
        hub.set_org("test");
        assert_eq!(hub.slug(), "test/octocat");
    }

    #[test]
    fn test_resolve_issue_number_precedence() {
        let hub = bare_hub(Some(14));
        assert_eq!(hub.resolve_issue_number(None).unwrap(), 14);
        assert_eq!(hub.resolve_issue_number(Some(3)).unwrap(), 3);

        let hub = bare_hub(None);
        assert_eq!(hub.resolve_issue_number(Some(3)).unwrap(), 3);
        assert!(matches!(
            hub.resolve_issue_number(None),
            Err(HubkitError::Config(_))
        ));
    }

    #[test]
    fn test_remove_clone_rejects_unrecorded_path() {
        let mut hub = bare_hub(None);
        let err = hub.remove_clone("scratch/never-cloned").unwrap_err();
        assert!(matches!(err, HubkitError::CloneRegistry(_)));
    }

    #[test]
    fn test_cloned_repos_starts_empty() {
        let hub = bare_hub(None);
        assert!(hub.cloned_repos().is_empty());
    }
}
