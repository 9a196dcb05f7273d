use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dockerfile_bump::auth::Token;
use dockerfile_bump::cli::{run_update_workflow, UpdateRequest};
use dockerfile_bump::config;
use dockerfile_bump::git::{Git2Repository, GitCliPusher};
use dockerfile_bump::release::GithubReleases;
use dockerfile_bump::{logging, ui, BumpError};

#[derive(clap::Parser)]
#[command(
    name = "dockerfile-bump",
    version,
    about = "Update the version pinned in a Dockerfile to the latest GitHub release and push the change"
)]
struct Args {
    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "A GitHub token, used for the release API and embedded in the push URL"
    )]
    token: Option<String>,

    #[arg(
        long,
        help = "The GitHub repo (in the format of owner/repo) whose release versions are watched"
    )]
    repo: String,

    #[arg(
        long,
        default_value = "",
        help = "The version pattern (regex) to replace; required unless the context has a built-in rule"
    )]
    pattern: String,

    #[arg(
        long,
        default_value = "",
        help = "The replacement for the matched pattern; {version} is the resolved version"
    )]
    replace: String,

    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        help = "The repo (owner/repo) running this update; selects built-in patch rules"
    )]
    context: Option<String>,

    #[arg(long, help = "Target Dockerfile (relative paths resolve against the repository root)")]
    dockerfile: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Remote to push to")]
    remote: Option<String>,

    #[arg(short, long, help = "Branch to push to (defaults to the checked-out branch)")]
    branch: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let token = args.token.as_deref().and_then(Token::new);

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let source = GithubReleases::new(config.api_url.clone(), token.clone())
        .context("Failed to build HTTP client")?;
    let pusher = GitCliPusher::new();

    let request = UpdateRequest {
        repo: args.repo,
        context: args.context,
        pattern: args.pattern,
        replace: args.replace,
        token,
        dockerfile: args.dockerfile,
        remote: args.remote,
        branch: args.branch,
        dry_run: args.dry_run,
    };

    let mut stdout = std::io::stdout();
    match run_update_workflow(&request, &config, &source, &repo, &pusher, &mut stdout) {
        Ok(result) => {
            for warning in &result.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_workflow_result(&result);
            Ok(())
        }
        Err(BumpError::Push {
            status,
            stdout,
            stderr,
        }) => {
            ui::display_error(&format!("Push failed with {}", status));
            eprint!("{}", ui::format_push_streams(&stdout, &stderr));
            std::process::exit(1);
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
