use crate::auth::Token;
use crate::domain::{ReleaseTag, RepoSlug};
use crate::error::{BumpError, Result};
use crate::release::ReleaseSource;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

#[derive(Deserialize, Debug, Clone)]
struct ReleaseInfo {
    tag_name: String,
}

#[derive(Deserialize, Debug, Clone)]
struct ApiError {
    message: String,
}

/// Latest-release lookups against the GitHub REST API
pub struct GithubReleases {
    client: Client,
    api_url: String,
    token: Option<Token>,
}

impl GithubReleases {
    /// Create a client for `api_url` (use [DEFAULT_API_URL] for github.com).
    ///
    /// Requests are unauthenticated when `token` is `None`, which works for
    /// public repositories within the anonymous rate limit.
    pub fn new(api_url: impl Into<String>, token: Option<Token>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dockerfile-bump/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GithubReleases {
            client,
            api_url: api_url.into(),
            token,
        })
    }

    /// `GET` endpoint for the latest release of `repo`
    pub fn release_url(&self, repo: &RepoSlug) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            repo.owner,
            repo.name
        )
    }
}

impl ReleaseSource for GithubReleases {
    fn latest_release(&self, repo: &RepoSlug) -> Result<ReleaseTag> {
        let url = self.release_url(repo);
        tracing::debug!(url = %url, authenticated = self.token.is_some(), "fetching latest release");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        check_status(status, repo, &body)?;
        parse_release(&body)
    }
}

/// Map an HTTP status to the error kinds callers distinguish.
fn check_status(status: StatusCode, repo: &RepoSlug, body: &str) -> Result<()> {
    if status == StatusCode::NOT_FOUND {
        return Err(BumpError::NotFound(repo.to_string()));
    }

    if !status.is_success() {
        let detail = serde_json::from_str::<ApiError>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.trim().chars().take(200).collect());
        return Err(BumpError::network(format!(
            "Release lookup for {} returned {}: {}",
            repo, status, detail
        )));
    }

    Ok(())
}

/// Extract the tag from a release JSON document.
fn parse_release(body: &str) -> Result<ReleaseTag> {
    let info: ReleaseInfo = serde_json::from_str(body)
        .map_err(|e| BumpError::network(format!("Unexpected release payload: {}", e)))?;

    if info.tag_name.trim().is_empty() {
        return Err(BumpError::network("Release has an empty tag_name"));
    }

    Ok(ReleaseTag::new(info.tag_name))
}
