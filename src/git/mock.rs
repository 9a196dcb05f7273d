use crate::error::{BumpError, Result};
use crate::git::{PushOutput, Pusher, Repository};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    workdir: PathBuf,
    branch: Option<String>,
    remotes: HashMap<String, String>,
    modified: RefCell<HashSet<PathBuf>>,
    staged: RefCell<Vec<PathBuf>>,
    commits: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new mock repository rooted at `workdir`, on branch `main`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            branch: Some("main".to_string()),
            remotes: HashMap::new(),
            modified: RefCell::new(HashSet::new()),
            staged: RefCell::new(Vec::new()),
            commits: RefCell::new(Vec::new()),
        }
    }

    /// Add a remote
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Set the checked-out branch; `None` means detached HEAD
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(str::to_string);
    }

    /// Mark a path as having unstaged modifications
    pub fn mark_modified(&self, path: impl AsRef<Path>) {
        let key = self.key(path.as_ref());
        self.modified.borrow_mut().insert(key);
    }

    /// Paths staged so far, relative to the workdir
    pub fn staged(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    /// Messages of commits made so far
    pub fn commit_messages(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    fn key(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.workdir)
            .unwrap_or(path)
            .to_path_buf()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn is_modified(&self, path: &Path) -> Result<bool> {
        Ok(self.modified.borrow().contains(&self.key(path)))
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let key = self.key(path);
        self.modified.borrow_mut().remove(&key);
        self.staged.borrow_mut().push(key);
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut commits = self.commits.borrow_mut();
        commits.push(message.to_string());
        Ok(format!("{:040x}", commits.len()))
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| BumpError::config(format!("No remote named '{}' found", remote)))
    }

    fn current_branch(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| BumpError::config("HEAD is detached"))
    }
}

/// A recorded push call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub workdir: PathBuf,
    pub target: String,
    pub refspec: String,
}

/// Pusher that records calls and optionally fails
#[derive(Default)]
pub struct MockPusher {
    calls: RefCell<Vec<PushCall>>,
    failure: Option<(String, String)>,
}

impl MockPusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every push fail with the given captured output
    pub fn failing(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockPusher {
            calls: RefCell::new(Vec::new()),
            failure: Some((stdout.into(), stderr.into())),
        }
    }

    pub fn calls(&self) -> Vec<PushCall> {
        self.calls.borrow().clone()
    }
}

impl Pusher for MockPusher {
    fn push(&self, workdir: &Path, target: &str, refspec: &str) -> Result<PushOutput> {
        self.calls.borrow_mut().push(PushCall {
            workdir: workdir.to_path_buf(),
            target: target.to_string(),
            refspec: refspec.to_string(),
        });

        match &self.failure {
            Some((stdout, stderr)) => Err(BumpError::Push {
                status: "exit status: 1".to_string(),
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            }),
            None => Ok(PushOutput::default()),
        }
    }
}
