//! REST API client
//!
//! A configured client carrying the bearer token and pagination settings
//! resolved at facade construction. Only the operations the facade
//! forwards are implemented; everything here is a thin, typed call to the
//! issues API.

use crate::config::Config;
use crate::error::{HubkitError, Result};
use crate::github::retry::{with_retry, RetryConfig};
use crate::github::types::{CloseOptions, Comment, Issue, Label, User};
use reqwest::{header, Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Per-request timeout for single-resource fetches
const GET_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-request timeout for create/update operations
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);
/// Per-request timeout for paginated list fetches
const LIST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("hubkit/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct AddLabelsRequest<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct AddCommentRequest<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct CloseIssueRequest<'a> {
    state: &'static str,
    #[serde(flatten)]
    options: &'a CloseOptions,
}

/// Configured GitHub REST client
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    rest_base_url: String,
    token: Option<String>,
    per_page: u32,
    auto_paginate: bool,
    retry: RetryConfig,
}

impl GitHubClient {
    /// Create a client from resolved configuration
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static(USER_AGENT),
                );
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/vnd.github.v3+json"),
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            rest_base_url: resolve_rest_base(&config.api_url),
            token: config.token.clone(),
            per_page: config.per_page,
            auto_paginate: config.auto_paginate,
            retry: RetryConfig::default(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn auto_paginate(&self) -> bool {
        self.auto_paginate
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// The identity behind the configured credential (GET /user)
    pub async fn authenticated_user(&self) -> Result<User> {
        with_retry(&self.retry, "authenticated_user", || {
            self.fetch_authenticated_user()
        })
        .await
    }

    async fn fetch_authenticated_user(&self) -> Result<User> {
        let url = format!("{}/user", self.rest_base_url);
        debug!("resolving authenticated login");

        let response = self.auth(self.client.get(&url)).timeout(GET_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            _ => Err(api_error(response, "get authenticated user").await),
        }
    }

    /// Fetch a single issue by number
    pub async fn get_issue(&self, slug: &str, number: u64) -> Result<Issue> {
        with_retry(&self.retry, "get_issue", || self.fetch_issue(slug, number)).await
    }

    async fn fetch_issue(&self, slug: &str, number: u64) -> Result<Issue> {
        let url = format!("{}/repos/{}/issues/{}", self.rest_base_url, slug, number);
        debug!(slug = %slug, number = %number, "fetching issue");

        let response = self.auth(self.client.get(&url)).timeout(GET_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(HubkitError::NotFound(format!(
                "issue: {}#{}",
                slug, number
            ))),
            _ => Err(api_error(response, "get issue").await),
        }
    }

    /// Add a set of labels to an issue or pull request
    pub async fn add_labels(
        &self,
        slug: &str,
        number: u64,
        labels: &[String],
    ) -> Result<Vec<Label>> {
        let url = format!(
            "{}/repos/{}/issues/{}/labels",
            self.rest_base_url, slug, number
        );
        debug!(slug = %slug, number = %number, labels = ?labels, "adding labels");

        let response = self
            .auth(self.client.post(&url))
            .json(&AddLabelsRequest { labels })
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(response.json().await?),
            _ => Err(api_error(response, "add labels").await),
        }
    }

    /// Remove a single label from an issue or pull request
    ///
    /// A label that is not present on the issue maps to
    /// [`HubkitError::NotFound`] so callers can treat it as a per-item
    /// condition.
    pub async fn remove_label(&self, slug: &str, number: u64, label: &str) -> Result<()> {
        let url = format!(
            "{}/repos/{}/issues/{}/labels/{}",
            self.rest_base_url,
            slug,
            number,
            urlencoding::encode(label)
        );
        debug!(slug = %slug, number = %number, label = %label, "removing label");

        let response = self
            .auth(self.client.delete(&url))
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(HubkitError::NotFound(format!(
                "label: {} on issue: {}",
                label, number
            ))),
            _ => Err(api_error(response, "remove label").await),
        }
    }

    /// List the labels on an issue, following pagination links when
    /// auto-pagination is enabled
    pub async fn list_issue_labels(&self, slug: &str, number: u64) -> Result<Vec<Label>> {
        let mut url = format!(
            "{}/repos/{}/issues/{}/labels?per_page={}",
            self.rest_base_url, slug, number, self.per_page
        );
        let mut labels: Vec<Label> = Vec::new();

        loop {
            let (page, next) =
                with_retry(&self.retry, "list_issue_labels", || self.fetch_label_page(&url))
                    .await?;
            labels.extend(page);

            match next {
                Some(next_url) if self.auto_paginate => url = next_url,
                _ => break,
            }
        }

        debug!(slug = %slug, number = %number, count = labels.len(), "listed issue labels");
        Ok(labels)
    }

    async fn fetch_label_page(&self, url: &str) -> Result<(Vec<Label>, Option<String>)> {
        let response = self.auth(self.client.get(url)).timeout(LIST_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => {
                let next = next_link(response.headers());
                Ok((response.json().await?, next))
            }
            _ => Err(api_error(response, "list labels").await),
        }
    }

    /// Add a comment to an issue or pull request
    pub async fn add_comment(&self, slug: &str, number: u64, body: &str) -> Result<Comment> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.rest_base_url, slug, number
        );
        debug!(slug = %slug, number = %number, "adding comment");

        let response = self
            .auth(self.client.post(&url))
            .json(&AddCommentRequest { body })
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(response.json().await?),
            _ => Err(api_error(response, "add comment").await),
        }
    }

    /// Close an issue, forwarding any extra fields from `options`
    pub async fn close_issue(
        &self,
        slug: &str,
        number: u64,
        options: &CloseOptions,
    ) -> Result<Issue> {
        let url = format!("{}/repos/{}/issues/{}", self.rest_base_url, slug, number);
        info!(slug = %slug, number = %number, "closing issue");

        let response = self
            .auth(self.client.patch(&url))
            .json(&CloseIssueRequest {
                state: "closed",
                options,
            })
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(HubkitError::NotFound(format!(
                "issue: {}#{}",
                slug, number
            ))),
            _ => Err(api_error(response, "close issue").await),
        }
    }
}

/// Map a non-success response to an error, consuming the body for context
async fn api_error(response: Response, what: &str) -> HubkitError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => {
            HubkitError::Auth("GitHub authentication failed".to_string())
        }
        StatusCode::FORBIDDEN => {
            HubkitError::Api("GitHub API forbidden (rate limit?)".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let secs = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            HubkitError::RateLimited(secs)
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            HubkitError::Api(format!("{} failed: HTTP {}: {}", what, status, body))
        }
    }
}

/// Resolve the REST base URL
///
/// The bare public host maps to its API host; anything else (including a
/// GHES `/api/v3` URL, which is what the runner provides) is used as-is.
fn resolve_rest_base(url: &str) -> String {
    let base = url.trim_end_matches('/');
    if base == "https://github.com" || base == "http://github.com" {
        "https://api.github.com".to_string()
    } else {
        base.to_string()
    }
}

/// Extract the `rel="next"` target from an RFC 5988 Link header
fn next_link(headers: &header::HeaderMap) -> Option<String> {
    let value = headers.get(header::LINK)?.to_str().ok()?;
    value.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.contains(r#"rel="next""#) {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::to_string)
    })
}
