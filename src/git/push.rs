use crate::error::{BumpError, Result};
use crate::git::Pusher;
use std::path::Path;
use std::process::Command;

/// Output captured from a `git push` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Pushes by running the `git` executable
pub struct GitCliPusher {
    program: String,
}

impl GitCliPusher {
    pub fn new() -> Self {
        GitCliPusher {
            program: "git".to_string(),
        }
    }

    /// Use a different executable in place of `git`
    pub fn with_program(program: impl Into<String>) -> Self {
        GitCliPusher {
            program: program.into(),
        }
    }
}

impl Default for GitCliPusher {
    fn default() -> Self {
        Self::new()
    }
}

impl Pusher for GitCliPusher {
    fn push(&self, workdir: &Path, target: &str, refspec: &str) -> Result<PushOutput> {
        let output = Command::new(&self.program)
            .current_dir(workdir)
            .args(["push", target, refspec])
            // Never block on an interactive credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| {
                BumpError::network(format!("Failed to run {} push: {}", self.program, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(BumpError::Push {
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        Ok(PushOutput { stdout, stderr })
    }
}
