//! Remote operations

use std::path::Path;

use tracing::{info, instrument};

use crate::repository::{GitRepo, Result};
use prlog_core::error::GitError;

impl GitRepo {
    /// Get list of remote names
    pub fn remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes
            .iter()
            .filter_map(|r| r.map(|s| s.to_string()))
            .collect())
    }

    /// Check if a remote exists
    pub fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.remotes()?.iter().any(|r| r == name))
    }

    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<String> {
        match self.repo.find_remote(name) {
            Ok(remote) => remote
                .url()
                .map(|s| s.to_string())
                .ok_or_else(|| GitError::RemoteNotFound(name.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Check whether HEAD matches the remote-tracking ref of `branch`
    pub fn is_in_sync_with(&self, remote: &str, branch: &str) -> Result<bool> {
        let tracking = format!("refs/remotes/{}/{}", remote, branch);
        let remote_oid = match self.repo.find_reference(&tracking) {
            Ok(reference) => reference.peel_to_commit()?.id(),
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(false),
            Err(e) => return Err(GitError::Git2(e)),
        };

        Ok(self.head_commit()?.id() == remote_oid)
    }
}

/// Fetch from a remote using the git CLI (picks up the user's credentials)
#[instrument(fields(path = %path.display(), remote = %remote))]
pub fn git_fetch(path: &Path, remote: &str) -> Result<()> {
    let start = std::time::Instant::now();
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(path)
        .args(["fetch", "--quiet", remote])
        .output()
        .map_err(|e| GitError::FetchFailed(format!("could not run git: {}", e)))?;

    info!(
        remote,
        duration_ms = start.elapsed().as_millis(),
        success = output.status.success(),
        "git fetch (CLI)"
    );

    if output.status.success() {
        Ok(())
    } else {
        Err(GitError::FetchFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}
