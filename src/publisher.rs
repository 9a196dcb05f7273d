//! Commits and pushes the patched target file.

use crate::auth::PushCredentials;
use crate::domain::RepoSlug;
use crate::error::{BumpError, Result};
use crate::git::{Pusher, Repository};
use std::path::Path;

/// Commit message used unless the config provides one; `{repo}` is the watched repository
pub const DEFAULT_COMMIT_MESSAGE: &str = "update version of {repo}";

/// What happened to the target file at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The file had no unstaged modification; nothing was committed
    NoChanges,
    /// A commit was created and pushed
    Pushed { commit: String, branch: String },
    /// Nothing was written or committed
    DryRun { would_change: bool },
}

/// Stages, commits and pushes a single file
pub struct Publisher<'a> {
    repo: &'a dyn Repository,
    pusher: &'a dyn Pusher,
    credentials: &'a dyn PushCredentials,
    remote: String,
    branch: Option<String>,
    message_template: String,
}

impl<'a> Publisher<'a> {
    pub fn new(
        repo: &'a dyn Repository,
        pusher: &'a dyn Pusher,
        credentials: &'a dyn PushCredentials,
    ) -> Self {
        Publisher {
            repo,
            pusher,
            credentials,
            remote: "origin".to_string(),
            branch: None,
            message_template: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Branch to push to; the checked-out branch when `None`
    pub fn branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn message_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    pub fn commit_message(&self, watched: &RepoSlug) -> String {
        self.message_template.replace("{repo}", &watched.to_string())
    }

    /// Publish pending modifications of `target`.
    ///
    /// The branch and push target are resolved before committing so that a
    /// misconfigured remote never leaves a stray local commit behind.
    ///
    /// # Returns
    /// * `Ok(NoChanges)` - `target` had no unstaged modification
    /// * `Ok(Pushed)` - A commit was created and pushed
    /// * `Err(Push)` - The push failed; captured output has the token redacted
    pub fn publish(&self, target: &Path, watched: &RepoSlug) -> Result<PublishOutcome> {
        if !self.repo.is_modified(target)? {
            tracing::info!(path = %target.display(), "No changes!");
            return Ok(PublishOutcome::NoChanges);
        }

        let branch = match &self.branch {
            Some(branch) => branch.clone(),
            None => self.repo.current_branch()?,
        };
        let remote_url = self.repo.remote_url(&self.remote)?;
        let push_target = self.credentials.push_target(&self.remote, &remote_url)?;

        self.repo.stage(target)?;
        let commit = self.repo.commit(&self.commit_message(watched))?;
        tracing::info!(commit = %commit, "committed");

        let refspec = format!("HEAD:refs/heads/{}", branch);
        let workdir = self.repo.workdir()?;
        tracing::info!(
            target = %self.credentials.redact(&push_target),
            refspec = %refspec,
            "pushing"
        );

        match self.pusher.push(&workdir, &push_target, &refspec) {
            Ok(output) => {
                tracing::debug!(
                    stdout = %self.credentials.redact(&output.stdout),
                    stderr = %self.credentials.redact(&output.stderr),
                    "push finished"
                );
            }
            Err(BumpError::Push {
                status,
                stdout,
                stderr,
            }) => {
                return Err(BumpError::Push {
                    status,
                    stdout: self.credentials.redact(&stdout),
                    stderr: self.credentials.redact(&stderr),
                });
            }
            Err(e) => return Err(e),
        }

        Ok(PublishOutcome::Pushed { commit, branch })
    }
}
