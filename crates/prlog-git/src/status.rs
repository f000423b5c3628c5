//! Repository status operations

use tracing::{info, instrument};

use crate::remote::git_fetch;
use crate::repository::{GitRepo, Result};
use prlog_core::error::GitError;

impl GitRepo {
    /// Check if the working directory is clean (no uncommitted changes)
    pub fn is_clean(&self) -> Result<bool> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
                || status.is_wt_new()
                || status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
            {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Get the current branch name, `None` for a detached or unborn HEAD
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Make sure the local checkout is fit to release from.
    ///
    /// The working tree must be clean, HEAD must be on `branch`, `remote` must
    /// exist, and after fetching, HEAD must equal `<remote>/<branch>`.
    #[instrument(skip(self))]
    pub fn ensure_clean_local_state(&self, remote: &str, branch: &str) -> Result<()> {
        if !self.is_clean()? {
            return Err(GitError::DirtyWorkingDirectory);
        }

        match self.current_branch()? {
            Some(current) if current == branch => {}
            other => {
                return Err(GitError::WrongBranch {
                    expected: branch.to_string(),
                    found: other.map_or_else(
                        || "a detached HEAD".to_string(),
                        |b| format!("'{}'", b),
                    ),
                })
            }
        }

        if !self.has_remote(remote)? {
            return Err(GitError::RemoteNotFound(remote.to_string()));
        }

        git_fetch(self.path(), remote)?;

        if !self.is_in_sync_with(remote, branch)? {
            return Err(GitError::OutOfDate {
                remote: remote.to_string(),
                branch: branch.to_string(),
            });
        }

        info!(remote, branch, "local git state is clean");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join("file.txt"), "content").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_is_clean() {
        let (_temp, repo) = setup_repo();
        assert!(repo.is_clean().unwrap());
    }

    #[test]
    fn test_is_dirty() {
        let (temp, repo) = setup_repo();
        std::fs::write(temp.path().join("new_file.txt"), "new").unwrap();
        assert!(!repo.is_clean().unwrap());
    }

    #[test]
    fn test_current_branch() {
        let (_temp, repo) = setup_repo();
        // Git might default to 'master' or 'main' depending on config
        assert!(repo.current_branch().unwrap().is_some());
    }

    #[test]
    fn test_dirty_tree_rejected() {
        let (temp, repo) = setup_repo();
        std::fs::write(temp.path().join("file.txt"), "modified").unwrap();
        let result = repo.ensure_clean_local_state("origin", "main");
        assert!(matches!(result, Err(GitError::DirtyWorkingDirectory)));
    }

    #[test]
    fn test_wrong_branch_rejected() {
        let (_temp, repo) = setup_repo();
        let result = repo.ensure_clean_local_state("origin", "release-train");
        assert!(matches!(result, Err(GitError::WrongBranch { .. })));
    }

    #[test]
    fn test_missing_remote_rejected() {
        let (_temp, repo) = setup_repo();
        let branch = repo.current_branch().unwrap().unwrap();
        let result = repo.ensure_clean_local_state("origin", &branch);
        assert!(matches!(result, Err(GitError::RemoteNotFound(_))));
    }
}
