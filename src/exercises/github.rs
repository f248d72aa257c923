//! GitHub repository metadata over the public REST API.

use reqwest::{header, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REPO_URL: &str = "https://github.com/zmiller4/CS5300";

const USER_AGENT: &str = "movie-theater-exercises";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("invalid repository url: {0}")]
    InvalidUrl(String),

    #[error("GitHub returned {0}")]
    Status(StatusCode),

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Subset of the `GET /repos/{owner}/{repo}` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

/// Extracts `owner/repo` from a `github.com` URL, dropping a trailing `.git`.
pub fn parse_github_repo_url(url: &str) -> Result<RepoRef, GithubError> {
    let parsed = Url::parse(url).map_err(|e| GithubError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.host_str() {
        Some("github.com") | Some("www.github.com") => {}
        _ => return Err(GithubError::InvalidUrl(format!("{url}: not a github.com url"))),
    }

    let mut segments = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty());
    let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
        return Err(GithubError::InvalidUrl(format!(
            "{url}: path must look like /owner/repo"
        )));
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    pub fn new() -> Result<Self, GithubError> {
        Self::with_api_base(GITHUB_API_BASE)
    }

    /// Client against a different API root, e.g. a mock server.
    pub fn with_api_base(api_base: &str) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_repo_info(&self, url: &str) -> Result<RepoInfo, GithubError> {
        let RepoRef { owner, repo } = parse_github_repo_url(url)?;
        let api_url = format!("{}/repos/{owner}/{repo}", self.api_base);
        debug!("fetching {}", api_url);

        let response = self
            .http
            .get(&api_url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status(status));
        }
        Ok(response.json::<RepoInfo>().await?)
    }
}
