//! Exit codes for the CLI

use prlog_core::{ConfigError, GitError, VersionError};
use prlog_github::GitHubError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// GitHub API or network error
pub const NETWORK_ERROR: i32 = 6;

/// Pick the exit code for the first recognized error in the chain
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return CONFIG_ERROR;
        }
        if cause.is::<GitError>() {
            return GIT_ERROR;
        }
        if cause.is::<VersionError>() {
            return VERSION_ERROR;
        }
        if cause.is::<GitHubError>() {
            return NETWORK_ERROR;
        }
    }
    ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_domain_errors() {
        let err = anyhow::Error::from(ConfigError::invalid("git.remote", "empty"));
        assert_eq!(for_error(&err), CONFIG_ERROR);

        let err = anyhow::Error::from(GitError::DirtyWorkingDirectory);
        assert_eq!(for_error(&err), GIT_ERROR);

        let err = anyhow::Error::from(GitHubError::RateLimited);
        assert_eq!(for_error(&err), NETWORK_ERROR);
    }

    #[test]
    fn test_context_is_unwrapped() {
        let result: Result<(), VersionError> =
            Err(VersionError::ParseFailed("1.0".to_string(), "bad".to_string()));
        let err = result.context("invalid --target-version").unwrap_err();
        assert_eq!(for_error(&err), VERSION_ERROR);
    }

    #[test]
    fn test_unknown_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(for_error(&err), ERROR);
    }
}
