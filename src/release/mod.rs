//! Version resolution against a release-hosting service
//!
//! The [ReleaseSource] trait abstracts "get the latest release of a repository".
//! Implementations:
//!
//! - [github::GithubReleases]: the GitHub REST API over a blocking `reqwest` client
//! - [mock::MockReleases]: fixed answers for tests

pub mod github;
pub mod mock;

pub use github::GithubReleases;
pub use mock::MockReleases;

use crate::domain::{NormalizedVersion, ReleaseTag, RepoSlug};
use crate::error::Result;

/// Source of published releases
pub trait ReleaseSource {
    /// Fetch the tag of the most recent published release.
    ///
    /// # Returns
    /// * `Ok(ReleaseTag)` - The raw tag, e.g. `v1.2.3`
    /// * `Err(NotFound)` - The repository has no releases (or does not exist)
    /// * `Err(Network)` - The service could not be reached or answered garbage
    fn latest_release(&self, repo: &RepoSlug) -> Result<ReleaseTag>;
}

/// Resolve the latest release of `repo` to a version without the `v` prefix.
pub fn resolve_version(source: &dyn ReleaseSource, repo: &RepoSlug) -> Result<NormalizedVersion> {
    let tag = source.latest_release(repo)?;
    let version = tag.normalize();
    tracing::info!(repo = %repo, tag = %tag, version = %version, "resolved latest release");
    Ok(version)
}
