use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for dockerfile-bump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("No release found for {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("File I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Push failed with {status}\nStdout: {stdout}\nStderr: {stderr}")]
    Push {
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in dockerfile-bump
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a network error with context
    pub fn network(msg: impl Into<String>) -> Self {
        BumpError::Network(msg.into())
    }

    /// Wrap an I/O error with the path it happened on
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BumpError::FileIo {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any file or git state was touched
    /// because the inputs were unusable.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BumpError::Config(_) | BumpError::Pattern { .. } | BumpError::Toml(_)
        )
    }
}

impl From<reqwest::Error> for BumpError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the request URL; the token only travels in headers
        BumpError::Network(err.without_url().to_string())
    }
}
