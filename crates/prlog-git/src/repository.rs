//! Git repository operations

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{info, instrument};

use prlog_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository whose work tree is `path`
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|e| open_error(e, path))?;
        Self::with_work_tree(repo)
    }

    /// Open the repository containing `start_path`, searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        let repo = Repository::discover(start_path).map_err(|e| open_error(e, start_path))?;
        Self::with_work_tree(repo)
    }

    /// Changelogs are generated from a checkout; bare repositories are rejected
    fn with_work_tree(repo: Repository) -> Result<Self> {
        let Some(work_tree) = repo.workdir() else {
            return Err(GitError::BareRepository(repo.path().to_path_buf()));
        };
        let path = work_tree.to_path_buf();
        info!(path = %path.display(), "opened git repository");

        Ok(Self { repo, path })
    }

    /// Root of the work tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit at the tip of the checked-out branch
    pub(crate) fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self.repo.head()?;
        head.peel_to_commit().map_err(GitError::Git2)
    }
}

fn open_error(err: git2::Error, path: &Path) -> GitError {
    if err.code() == git2::ErrorCode::NotFound {
        GitError::NotARepository(path.to_path_buf())
    } else {
        GitError::OpenFailed(err.message().to_string())
    }
}
