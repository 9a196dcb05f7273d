//! Main workflow orchestration logic
//!
//! Runs one update: resolve the latest release, patch the target file, then
//! publish the change. Kept separate from argument parsing so the whole flow
//! can be driven from tests with mock sources, repositories and pushers.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::auth::{ConfiguredRemote, PushCredentials, Token, TokenInUrl};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{ContextTable, PatchSpec, RepoSlug};
use crate::error::Result;
use crate::git::{Pusher, Repository};
use crate::patcher::{self, WriteMode};
use crate::publisher::{PublishOutcome, Publisher};
use crate::release::{self, ReleaseSource};

/// Arguments for the update workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// The context is passed in explicitly rather than read from the environment.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// Watched repository, `owner/name`
    pub repo: String,

    /// Repository running the automation, `owner/name`
    pub context: Option<String>,

    /// Caller-supplied pattern, used when the context has no built-in rule
    pub pattern: String,

    /// Caller-supplied replacement template
    pub replace: String,

    pub token: Option<Token>,

    /// Overrides the configured target file
    pub dockerfile: Option<PathBuf>,

    /// Overrides the configured remote
    pub remote: Option<String>,

    /// Overrides the configured branch
    pub branch: Option<String>,

    /// Compute the patch without writing the file or touching git
    pub dry_run: bool,
}

/// Result of a successful update workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Latest release version, without the `v` prefix
    pub version: String,

    /// The value substituted into the file (possibly truncated)
    pub substituted: String,

    /// Number of pattern matches replaced
    pub replacements: usize,

    pub outcome: PublishOutcome,

    /// Non-fatal issues noticed along the way
    pub warnings: Vec<BoundaryWarning>,
}

/// Stages of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Patching,
    Publishing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Patching => "patching",
            Stage::Publishing => "publishing",
        };
        f.write_str(name)
    }
}

/// Main update workflow
///
/// Orchestrates the entire update:
/// 1. Select the patch rule for the context (fails before any I/O if missing)
/// 2. Resolve the latest release of the watched repository
/// 3. Patch the target file
/// 4. Commit and push if the file changed
///
/// # Arguments
///
/// * `request` - What to update and how
/// * `config` - Loaded configuration
/// * `source` - Release lookup
/// * `repo` - Working tree the target file lives in
/// * `pusher` - Push transport
/// * `out` - Progress output
///
/// # Returns
///
/// Result describing what was changed, or the first error encountered
pub fn run_update_workflow(
    request: &UpdateRequest,
    config: &Config,
    source: &dyn ReleaseSource,
    repo: &dyn Repository,
    pusher: &dyn Pusher,
    out: &mut dyn Write,
) -> Result<WorkflowResult> {
    let watched = RepoSlug::parse(&request.repo)?;

    let table = ContextTable::with_overrides(&config.contexts);
    let caller = PatchSpec::new(request.pattern.clone(), request.replace.clone());
    let selection = table.select(request.context.as_deref(), &caller)?;
    let patch = selection.spec.compile()?;
    let mut warnings = selection.warnings;
    tracing::debug!(source = ?selection.source, pattern = %selection.spec.pattern, "selected patch rule");

    let dockerfile = request
        .dockerfile
        .clone()
        .unwrap_or_else(|| config.dockerfile.clone());
    let target = if dockerfile.is_relative() {
        repo.workdir()?.join(dockerfile)
    } else {
        dockerfile
    };

    tracing::debug!(stage = %Stage::Resolving, repo = %watched);
    let version = release::resolve_version(source, &watched)?;
    let substituted = version.truncate(patch.precision);
    writeln!(out, "The latest version of {} is v{}.", watched, version)?;

    tracing::debug!(stage = %Stage::Patching, path = %target.display(), value = %substituted);
    let mode = if request.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };
    let report = patcher::apply_to_file(&target, &patch, &substituted, mode)?;
    if report.replacements == 0 {
        warnings.push(BoundaryWarning::NoMatches {
            pattern: selection.spec.pattern.clone(),
        });
    }

    let outcome = if request.dry_run {
        PublishOutcome::DryRun {
            would_change: report.changed,
        }
    } else {
        tracing::debug!(stage = %Stage::Publishing);
        let remote = request
            .remote
            .clone()
            .unwrap_or_else(|| config.remote.clone());

        let credentials: Box<dyn PushCredentials> = match &request.token {
            Some(token) => Box::new(TokenInUrl::new(token.clone())),
            None => {
                warnings.push(BoundaryWarning::NoPushToken {
                    remote: remote.clone(),
                });
                Box::new(ConfiguredRemote)
            }
        };

        Publisher::new(repo, pusher, credentials.as_ref())
            .remote(remote)
            .branch(request.branch.clone().or_else(|| config.branch.clone()))
            .message_template(config.commit_message.clone())
            .publish(&target, &watched)?
    };

    for warning in &warnings {
        tracing::debug!(warning = %warning, "non-fatal condition");
    }

    Ok(WorkflowResult {
        version: version.to_string(),
        substituted,
        replacements: report.replacements,
        outcome,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BumpError;
    use crate::git::{MockPusher, MockRepository};
    use crate::release::MockReleases;
    use std::fs;

    struct Fixture {
        dir: tempfile::TempDir,
        repo: MockRepository,
    }

    fn fixture(dockerfile: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Dockerfile"), dockerfile).unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.add_remote("origin", "https://github.com/legendu-net/docker-base.git");
        Fixture { dir, repo }
    }

    fn request(context: &str) -> UpdateRequest {
        UpdateRequest {
            repo: "legendu-net/icon".to_string(),
            context: Some(context.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Resolving.to_string(), "resolving");
        assert_eq!(Stage::Publishing.to_string(), "publishing");
    }

    #[test]
    fn test_unknown_context_fails_before_network() {
        let fx = fixture("-v v1.2.3\n");
        let source = MockReleases::new().with_release("legendu-net/icon", "v1.2.4");
        let pusher = MockPusher::new();
        let mut out = Vec::new();

        let err = run_update_workflow(
            &request("someone/else"),
            &Config::default(),
            &source,
            &fx.repo,
            &pusher,
            &mut out,
        )
        .unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(source.requests(), 0);
        assert_eq!(
            fs::read_to_string(fx.dir.path().join("Dockerfile")).unwrap(),
            "-v v1.2.3\n"
        );
    }

    #[test]
    fn test_not_found_leaves_file_untouched() {
        let fx = fixture("-v v1.2.3\n");
        let source = MockReleases::new();
        let pusher = MockPusher::new();
        let mut out = Vec::new();

        let err = run_update_workflow(
            &request("legendu-net/docker-base"),
            &Config::default(),
            &source,
            &fx.repo,
            &pusher,
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, BumpError::NotFound(_)));
        assert_eq!(
            fs::read_to_string(fx.dir.path().join("Dockerfile")).unwrap(),
            "-v v1.2.3\n"
        );
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let fx = fixture("-v v1.2.3\n");
        let source = MockReleases::new().with_release("legendu-net/icon", "v1.2.4");
        let pusher = MockPusher::new();
        let mut out = Vec::new();
        let req = UpdateRequest {
            dry_run: true,
            ..request("legendu-net/docker-base")
        };

        let result = run_update_workflow(
            &req,
            &Config::default(),
            &source,
            &fx.repo,
            &pusher,
            &mut out,
        )
        .unwrap();

        assert_eq!(
            result.outcome,
            PublishOutcome::DryRun { would_change: true }
        );
        assert_eq!(result.replacements, 1);
        assert_eq!(
            fs::read_to_string(fx.dir.path().join("Dockerfile")).unwrap(),
            "-v v1.2.3\n"
        );
        assert!(pusher.calls().is_empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "The latest version of legendu-net/icon is v1.2.4.\n"
        );
    }

    #[test]
    fn test_config_context_and_dockerfile() {
        let fx = fixture("");
        fs::create_dir(fx.dir.path().join("docker")).unwrap();
        fs::write(
            fx.dir.path().join("docker/Dockerfile"),
            "ARG TOOL_VERSION=0.1.0\n",
        )
        .unwrap();
        let mut config = Config::default();
        config.dockerfile = PathBuf::from("docker/Dockerfile");
        config.contexts.insert(
            "me/tools".to_string(),
            PatchSpec::new(r"TOOL_VERSION=\S+", "TOOL_VERSION={version}"),
        );
        let source = MockReleases::new().with_release("legendu-net/icon", "v0.2.0");
        let pusher = MockPusher::new();
        let mut out = Vec::new();

        let result = run_update_workflow(
            &request("me/tools"),
            &config,
            &source,
            &fx.repo,
            &pusher,
            &mut out,
        )
        .unwrap();

        assert_eq!(result.replacements, 1);
        assert_eq!(
            fs::read_to_string(fx.dir.path().join("docker/Dockerfile")).unwrap(),
            "ARG TOOL_VERSION=0.2.0\n"
        );
        // MockRepository only reports paths marked modified
        assert_eq!(result.outcome, PublishOutcome::NoChanges);
    }

    #[test]
    fn test_no_token_warns() {
        let fx = fixture("-v v1.2.3\n");
        fx.repo.mark_modified("Dockerfile");
        let source = MockReleases::new().with_release("legendu-net/icon", "v1.2.4");
        let pusher = MockPusher::new();
        let mut out = Vec::new();

        let result = run_update_workflow(
            &request("legendu-net/docker-base"),
            &Config::default(),
            &source,
            &fx.repo,
            &pusher,
            &mut out,
        )
        .unwrap();

        assert!(result.warnings.contains(&BoundaryWarning::NoPushToken {
            remote: "origin".to_string()
        }));
        assert_eq!(pusher.calls()[0].target, "origin");
    }
}
