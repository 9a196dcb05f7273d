//! Credentials for the release API and for pushing
//!
//! The token never appears in `Debug`/`Display` output, and [Token::redact]
//! scrubs it from text captured from child processes.
//!
//! [PushCredentials] decides where `git push` sends the commit, so the
//! publisher does not care whether authentication comes from a token embedded
//! in the URL or from the credentials configured on the machine.

use crate::error::{BumpError, Result};
use std::fmt;

/// User name GitHub expects alongside an access token in HTTPS URLs
const TOKEN_USER: &str = "x-access-token";

/// A secret access token
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a token, treating blank input as no token at all
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Token(trimmed.to_string()))
        }
    }

    /// The raw token, for request headers and push URLs only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replace every occurrence of the token in `text`
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.0, "***")
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Decides the target argument of `git push`
pub trait PushCredentials {
    /// # Arguments
    /// * `remote` - Name of the configured remote (e.g. "origin")
    /// * `remote_url` - The URL that remote points at
    ///
    /// # Returns
    /// The string to hand to `git push` as its repository argument
    fn push_target(&self, remote: &str, remote_url: &str) -> Result<String>;

    /// Scrub secrets from text that may echo the push target
    fn redact(&self, text: &str) -> String {
        text.to_string()
    }

    /// Push target safe to print
    fn display_target(&self, remote: &str, remote_url: &str) -> String {
        match self.push_target(remote, remote_url) {
            Ok(target) => self.redact(&target),
            Err(_) => remote.to_string(),
        }
    }
}

/// Authenticate by embedding a token in an HTTPS URL.
///
/// Works in ephemeral CI checkouts that have no credential helper configured.
pub struct TokenInUrl {
    token: Token,
}

impl TokenInUrl {
    pub fn new(token: Token) -> Self {
        TokenInUrl { token }
    }
}

impl PushCredentials for TokenInUrl {
    fn push_target(&self, _remote: &str, remote_url: &str) -> Result<String> {
        let host_and_path = https_host_and_path(remote_url)?;
        Ok(format!(
            "https://{}:{}@{}",
            TOKEN_USER,
            self.token.expose(),
            host_and_path
        ))
    }

    fn redact(&self, text: &str) -> String {
        self.token.redact(text)
    }
}

/// Push to the named remote using whatever credentials git already has
pub struct ConfiguredRemote;

impl PushCredentials for ConfiguredRemote {
    fn push_target(&self, remote: &str, _remote_url: &str) -> Result<String> {
        Ok(remote.to_string())
    }
}

/// Reduce a remote URL to `host/path` suitable for an HTTPS URL.
///
/// Accepts `https://[user@]host/path`, `ssh://git@host/path` and scp-like
/// `git@host:path`.
fn https_host_and_path(remote_url: &str) -> Result<String> {
    let url = remote_url.trim();

    if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("ssh://"))
    {
        let rest = match rest.split_once('/') {
            Some((authority, path)) => {
                let host = authority.rsplit('@').next().unwrap_or(authority);
                // ssh://git@github.com:22/owner/name
                let host = host.split(':').next().unwrap_or(host);
                format!("{}/{}", host, path)
            }
            None => rest.rsplit('@').next().unwrap_or(rest).to_string(),
        };
        return Ok(rest);
    }

    if !url.contains("://") {
        if let Some((user_host, path)) = url.split_once(':') {
            let host = user_host.rsplit('@').next().unwrap_or(user_host);
            if !host.is_empty() && !path.is_empty() {
                return Ok(format!("{}/{}", host, path.trim_start_matches('/')));
            }
        }
    }

    Err(BumpError::config(format!(
        "Cannot embed a token in remote URL '{}' - expected an https or ssh URL",
        url
    )))
}
