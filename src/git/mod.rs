//! Git operations abstraction layer
//!
//! This module provides trait-based abstractions over the git operations the
//! publisher needs, so the publish flow can be exercised against a real
//! repository or against in-memory mocks.
//!
//! # Overview
//!
//! - [Repository]: working-tree status, staging and committing.
//!   [repository::Git2Repository] implements it with the `git2` crate,
//!   [mock::MockRepository] keeps everything in memory.
//! - [Pusher]: pushing the new commit. [push::GitCliPusher] runs the `git`
//!   executable, [mock::MockPusher] records calls.
//!
//! Pushing goes through the `git` executable rather than libgit2 because the
//! token-in-URL targets used in CI are handled by the CLI's HTTPS transport.

pub mod mock;
pub mod push;
pub mod repository;

pub use mock::{MockPusher, MockRepository};
pub use push::{GitCliPusher, PushOutput};
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Common git operation trait for abstraction
///
/// Paths passed to these methods may be absolute (inside the working tree) or
/// relative to the working tree root.
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> Result<PathBuf>;

    /// Whether `path` has modifications that are not staged yet
    ///
    /// # Returns
    /// * `Ok(true)` - The working tree copy differs from the index
    /// * `Ok(false)` - The file is clean (or only has staged changes)
    /// * `Err` - If the path is outside the working tree or git fails
    fn is_modified(&self, path: &Path) -> Result<bool>;

    /// Add `path` to the index
    fn stage(&self, path: &Path) -> Result<()>;

    /// Commit the index on top of HEAD
    ///
    /// # Returns
    /// * `Ok(String)` - Full hash of the new commit
    fn commit(&self, message: &str) -> Result<String>;

    /// URL configured for `remote`
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Short name of the checked-out branch
    ///
    /// # Returns
    /// * `Err` - If HEAD is detached
    fn current_branch(&self) -> Result<String>;
}

/// Pushes commits to a remote
pub trait Pusher {
    /// Push `refspec` to `target` from the working tree at `workdir`.
    ///
    /// # Arguments
    /// * `workdir` - Working tree root to run the push in
    /// * `target` - Remote name or URL (may carry credentials)
    /// * `refspec` - e.g. `HEAD:refs/heads/main`
    ///
    /// # Returns
    /// * `Ok(PushOutput)` - The push succeeded; captured output attached
    /// * `Err(Push)` - The push ran and failed; both output streams attached
    fn push(&self, workdir: &Path, target: &str, refspec: &str) -> Result<PushOutput>;
}
