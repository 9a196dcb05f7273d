// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use dockerfile_bump::cli::{run_update_workflow, UpdateRequest};
use dockerfile_bump::config::Config;
use dockerfile_bump::git::{Git2Repository, GitCliPusher, MockPusher};
use dockerfile_bump::publisher::PublishOutcome;
use dockerfile_bump::release::MockReleases;
use git2::Repository;
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_dockerfile-bump");

#[test]
fn test_help() {
    let output = Command::new(BIN)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--repo"));
    assert!(stdout.contains("--pattern"));
    assert!(stdout.contains("--replace"));
    assert!(stdout.contains("--token"));
}

#[test]
fn test_repo_is_required() {
    let output = Command::new(BIN)
        .env_remove("GITHUB_REPOSITORY")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--repo"));
}

// Helper function to setup a temporary git repo with a committed Dockerfile
fn setup_test_repo(dockerfile: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    fs::write(temp_dir.path().join("Dockerfile"), dockerfile).expect("Could not write Dockerfile");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("Dockerfile"))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");
    repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("Could not create commit");

    temp_dir
}

fn head_message(path: &Path) -> String {
    let repo = Repository::open(path).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    head.message().unwrap().to_string()
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn test_unknown_context_without_pattern_exits_nonzero() {
    let temp_dir = setup_test_repo("RUN icon -v v1.2.3\n");

    let output = Command::new(BIN)
        .current_dir(temp_dir.path())
        .env("GITHUB_REPOSITORY", "someone/unrelated")
        .env_remove("GITHUB_TOKEN")
        .args(["--repo", "legendu-net/icon"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Configuration error"), "stderr: {}", stderr);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Dockerfile")).unwrap(),
        "RUN icon -v v1.2.3\n"
    );
}

#[test]
fn test_docker_base_commit_and_noop_on_second_run() {
    let temp_dir = setup_test_repo("RUN icon -v v1.2.3\n");
    Repository::open(temp_dir.path())
        .unwrap()
        .remote("origin", "https://github.com/legendu-net/docker-base.git")
        .unwrap();
    let git_repo = Git2Repository::open(temp_dir.path()).unwrap();
    let source = MockReleases::new().with_release("legendu-net/icon", "v1.2.4");
    let pusher = MockPusher::new();
    let request = UpdateRequest {
        repo: "legendu-net/icon".to_string(),
        context: Some("legendu-net/docker-base".to_string()),
        branch: Some("main".to_string()),
        ..Default::default()
    };

    let mut out = Vec::new();
    let first = run_update_workflow(
        &request,
        &Config::default(),
        &source,
        &git_repo,
        &pusher,
        &mut out,
    )
    .unwrap();

    assert_eq!(first.version, "1.2.4");
    assert!(matches!(first.outcome, PublishOutcome::Pushed { .. }));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Dockerfile")).unwrap(),
        "RUN icon -v v1.2.4\n"
    );
    assert_eq!(head_message(temp_dir.path()), "update version of legendu-net/icon");
    assert_eq!(pusher.calls().len(), 1);
    assert_eq!(pusher.calls()[0].refspec, "HEAD:refs/heads/main");

    let second = run_update_workflow(
        &request,
        &Config::default(),
        &source,
        &git_repo,
        &pusher,
        &mut out,
    )
    .unwrap();

    assert_eq!(second.outcome, PublishOutcome::NoChanges);
    assert_eq!(pusher.calls().len(), 1);
}

#[test]
fn test_jupyterlab_truncates_to_minor() {
    let temp_dir = setup_test_repo("RUN pip3 install \"jupyterlab>=4.0.0,<4.3.0\"\n");
    let git_repo = Git2Repository::open(temp_dir.path()).unwrap();
    let source = MockReleases::new().with_release("jupyterlab/jupyterlab", "v4.4.1");
    let pusher = MockPusher::new();
    let request = UpdateRequest {
        repo: "jupyterlab/jupyterlab".to_string(),
        context: Some("legendu-net/docker-jupyterlab".to_string()),
        dry_run: true,
        ..Default::default()
    };

    let mut out = Vec::new();
    let result = run_update_workflow(
        &request,
        &Config::default(),
        &source,
        &git_repo,
        &pusher,
        &mut out,
    )
    .unwrap();

    assert_eq!(result.version, "4.4.1");
    assert_eq!(result.substituted, "4.4");
    assert_eq!(result.outcome, PublishOutcome::DryRun { would_change: true });
}

#[test]
fn test_push_to_local_bare_remote() {
    if !git_available() {
        eprintln!("git executable not found; skipping");
        return;
    }

    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();

    let temp_dir = setup_test_repo(",<4.3.0\n");
    {
        let repo = Repository::open(temp_dir.path()).unwrap();
        repo.remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();
    }

    let git_repo = Git2Repository::open(temp_dir.path()).unwrap();
    let source = MockReleases::new().with_release("coder/code-server", "v4.96.2");
    let pusher = GitCliPusher::new();
    let request = UpdateRequest {
        repo: "coder/code-server".to_string(),
        context: Some("legendu-net/docker-vscode-server".to_string()),
        branch: Some("main".to_string()),
        ..Default::default()
    };

    let mut out = Vec::new();
    let result = run_update_workflow(
        &request,
        &Config::default(),
        &source,
        &git_repo,
        &pusher,
        &mut out,
    )
    .unwrap();

    let commit = match result.outcome {
        PublishOutcome::Pushed { commit, .. } => commit,
        other => panic!("expected a push, got {:?}", other),
    };

    let remote = Repository::open_bare(remote_dir.path()).unwrap();
    let pushed = remote
        .find_reference("refs/heads/main")
        .unwrap()
        .target()
        .unwrap();
    assert_eq!(pushed.to_string(), commit);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Dockerfile")).unwrap(),
        ",<4.96\n"
    );
}
