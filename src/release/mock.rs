use crate::domain::{ReleaseTag, RepoSlug};
use crate::error::{BumpError, Result};
use crate::release::ReleaseSource;
use std::cell::Cell;
use std::collections::HashMap;

/// Release source with fixed answers, for testing without network access
pub struct MockReleases {
    releases: HashMap<String, String>,
    requests: Cell<usize>,
}

impl MockReleases {
    /// Create a source that knows no releases
    pub fn new() -> Self {
        MockReleases {
            releases: HashMap::new(),
            requests: Cell::new(0),
        }
    }

    /// Register the latest tag for a repository
    pub fn with_release(mut self, repo: impl Into<String>, tag: impl Into<String>) -> Self {
        self.releases.insert(repo.into(), tag.into());
        self
    }

    /// Number of lookups performed so far
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl Default for MockReleases {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseSource for MockReleases {
    fn latest_release(&self, repo: &RepoSlug) -> Result<ReleaseTag> {
        self.requests.set(self.requests.get() + 1);
        self.releases
            .get(&repo.to_string())
            .map(ReleaseTag::new)
            .ok_or_else(|| BumpError::NotFound(repo.to_string()))
    }
}
