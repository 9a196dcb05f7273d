use crate::error::{BumpError, Result};
use git2::{Repository as Git2Repo, Signature, Status};
use std::path::{Path, PathBuf};

/// Identity used for commits when the checkout has no user configured,
/// which is the norm on CI runners.
const FALLBACK_NAME: &str = "github-actions[bot]";
const FALLBACK_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Express `path` relative to the working tree root, as libgit2 expects.
    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = super::Repository::workdir(self)?;
        if let Ok(rel) = path.strip_prefix(&workdir) {
            return Ok(rel.to_path_buf());
        }

        // Symlinked temp dirs (e.g. /var -> /private/var) only line up once canonical
        let canonical_workdir = workdir.canonicalize()?;
        let canonical_path = path
            .canonicalize()
            .map_err(|e| BumpError::file_io(path, e))?;
        canonical_path
            .strip_prefix(&canonical_workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::config(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                tracing::debug!("no git identity configured, committing as {}", FALLBACK_NAME);
                Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| BumpError::config("Repository has no working tree (bare repository)"))
    }

    fn is_modified(&self, path: &Path) -> Result<bool> {
        let rel = self.relative_path(path)?;
        let status = self.repo.status_file(&rel)?;

        Ok(status.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE))
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let rel = self.relative_path(path)?;
        let mut index = self.repo.index()?;
        index.add_path(&rel)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(oid.to_string())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self
            .repo
            .find_remote(remote)
            .map_err(|_| BumpError::config(format!("No remote named '{}' found", remote)))?;

        found
            .url()
            .map(str::to_string)
            .ok_or_else(|| BumpError::config(format!("Remote '{}' has no valid URL", remote)))
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(BumpError::config(
                "HEAD is detached; pass --branch to choose the branch to push",
            ));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| BumpError::config("Current branch name is not valid UTF-8"))
    }
}
