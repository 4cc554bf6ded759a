//! Facade configuration
//!
//! An explicit configuration struct enumerating every recognized source:
//! explicit argument > environment variable > default. `from_env` reads the
//! process environment; `from_lookup` takes any variable lookup so tests can
//! inject configuration without mutating the environment.

use std::path::PathBuf;
use tracing::warn;

/// `org/repo` slug of the current repository
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Preferred access token variable, tried first
pub const ENV_ACCESS_TOKEN: &str = "HUBKIT_ACCESS_TOKEN";
/// CI-provided access token variable, tried second
pub const ENV_FALLBACK_TOKEN: &str = "GITHUB_TOKEN";
/// Pagination page size, defaults to 100
pub const ENV_PER_PAGE: &str = "HUBKIT_PER_PAGE";
/// Pagination toggle, defaults to true
pub const ENV_AUTO_PAGINATE: &str = "HUBKIT_AUTO_PAGINATE";
/// REST API base URL (set by the Actions runner, also for GHES)
pub const ENV_API_URL: &str = "GITHUB_API_URL";
/// Path to the workflow event payload file
pub const ENV_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
/// Commit SHA the workflow is running against
pub const ENV_SHA: &str = "GITHUB_SHA";
/// Set by the Actions runner; gates event auto-hydration
pub const ENV_CI: &str = "GITHUB_ACTIONS";

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_PER_PAGE: u32 = 100;

/// How a missing credential is treated at facade construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialMode {
    /// No token aborts construction
    #[default]
    Strict,
    /// No token logs a warning; API access is anonymous and rate-limited
    Lenient,
}

/// Resolved facade configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization, from an explicit value or the repository slug
    pub org: Option<String>,
    /// Repository, from an explicit value or the repository slug
    pub repo: Option<String>,
    /// Identity override; when unset the login is resolved from the
    /// authenticated credential after the API client is constructed
    pub login: Option<String>,
    /// Bearer credential
    pub token: Option<String>,
    /// Behavior when no credential is found
    pub credential_mode: CredentialMode,
    /// Pagination page size
    pub per_page: u32,
    /// Follow pagination links until result sets are exhausted
    pub auto_paginate: bool,
    /// REST API base URL
    pub api_url: String,
    /// Workflow event payload file, when running in CI
    pub event_path: Option<PathBuf>,
    /// Commit SHA of the current workflow run
    pub sha: Option<String>,
    /// Whether the CI indicator variable is set
    pub ci: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org: None,
            repo: None,
            login: None,
            token: None,
            credential_mode: CredentialMode::default(),
            per_page: DEFAULT_PER_PAGE,
            auto_paginate: true,
            api_url: DEFAULT_API_URL.to_string(),
            event_path: None,
            sha: None,
            ci: false,
        }
    }
}

impl Config {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let (org, repo) = match lookup(ENV_REPOSITORY) {
            Some(slug) => match slug.split_once('/') {
                Some((org, repo)) if !org.is_empty() && !repo.is_empty() => {
                    (Some(org.to_string()), Some(repo.to_string()))
                }
                _ => {
                    warn!(slug = %slug, "ignoring malformed repository slug");
                    (None, None)
                }
            },
            None => (None, None),
        };

        // first try the hubkit-specific token variable, then the one the
        // runner provides
        let token = lookup(ENV_ACCESS_TOKEN).or_else(|| lookup(ENV_FALLBACK_TOKEN));

        let per_page = match lookup(ENV_PER_PAGE) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "unparseable {}, using default", ENV_PER_PAGE);
                DEFAULT_PER_PAGE
            }),
            None => DEFAULT_PER_PAGE,
        };

        let auto_paginate = match lookup(ENV_AUTO_PAGINATE) {
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    warn!(value = %raw, "unparseable {}, using default", ENV_AUTO_PAGINATE);
                    true
                }
            },
            None => true,
        };

        Self {
            org,
            repo,
            login: None,
            token,
            credential_mode: CredentialMode::default(),
            per_page,
            auto_paginate,
            api_url: lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            event_path: lookup(ENV_EVENT_PATH).map(PathBuf::from),
            sha: lookup(ENV_SHA),
            ci: lookup(ENV_CI).is_some_and(|v| !v.is_empty()),
        }
    }

    /// Override the organization
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Override the repository
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Override the identity used for API attribution and git config
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Override the bearer credential
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Select strict or lenient handling of a missing credential
    pub fn with_credential_mode(mut self, mode: CredentialMode) -> Self {
        self.credential_mode = mode;
        self
    }

    /// Override the REST API base URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_repository_slug_resolution() {
        let config = Config::from_lookup(lookup_from(&[(ENV_REPOSITORY, "github/octocat")]));
        assert_eq!(config.org.as_deref(), Some("github"));
        assert_eq!(config.repo.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_malformed_slug_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[(ENV_REPOSITORY, "noslash")]));
        assert_eq!(config.org, None);
        assert_eq!(config.repo, None);
    }

    #[test]
    fn test_token_resolution_order() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_ACCESS_TOKEN, "hubkit-token"),
            (ENV_FALLBACK_TOKEN, "runner-token"),
        ]));
        assert_eq!(config.token.as_deref(), Some("hubkit-token"));

        let config = Config::from_lookup(lookup_from(&[(ENV_FALLBACK_TOKEN, "runner-token")]));
        assert_eq!(config.token.as_deref(), Some("runner-token"));

        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_pagination_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.per_page, 100);
        assert!(config.auto_paginate);
    }

    #[test]
    fn test_pagination_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_PER_PAGE, "25"),
            (ENV_AUTO_PAGINATE, "false"),
        ]));
        assert_eq!(config.per_page, 25);
        assert!(!config.auto_paginate);
    }

    #[test]
    fn test_unparseable_pagination_falls_back() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_PER_PAGE, "lots"),
            (ENV_AUTO_PAGINATE, "maybe"),
        ]));
        assert_eq!(config.per_page, 100);
        assert!(config.auto_paginate);
    }

    #[test]
    fn test_ci_indicator() {
        let config = Config::from_lookup(lookup_from(&[(ENV_CI, "true")]));
        assert!(config.ci);

        let config = Config::from_lookup(lookup_from(&[]));
        assert!(!config.ci);
    }

    #[test]
    fn test_explicit_overrides_win() {
        let config = Config::from_lookup(lookup_from(&[(ENV_REPOSITORY, "github/octocat")]))
            .with_org("acme")
            .with_token("explicit")
            .with_credential_mode(CredentialMode::Lenient);
        assert_eq!(config.org.as_deref(), Some("acme"));
        assert_eq!(config.repo.as_deref(), Some("octocat"));
        assert_eq!(config.token.as_deref(), Some("explicit"));
        assert_eq!(config.credential_mode, CredentialMode::Lenient);
    }
}
