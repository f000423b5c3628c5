//! Error types for prlog

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// A regular expression failed to compile
    #[error("Invalid regular expression for {field} '{pattern}': {message}")]
    InvalidPattern {
        field: String,
        pattern: String,
        message: String,
    },

    /// The "only since" cutoff could not be parsed
    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    /// Remote URL does not point at a GitHub repository
    #[error("Could not determine GitHub repository from remote URL '{0}'")]
    InvalidRemoteUrl(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Shorthand for an [`ConfigError::InvalidValue`]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at or above the path
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Repository has no work tree
    #[error("Bare repository at {0}; run prlog inside a checkout")]
    BareRepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Working directory is not clean
    #[error("Working directory has uncommitted changes")]
    DirtyWorkingDirectory,

    /// HEAD is not on the release branch
    #[error("Expected to be on branch '{expected}' but found {found}")]
    WrongBranch { expected: String, found: String },

    /// Local branch differs from its remote counterpart
    #[error("Local branch '{branch}' is not in sync with '{remote}/{branch}'")]
    OutOfDate { remote: String, branch: String },

    /// Failed to fetch
    #[error("Failed to fetch from remote: {0}")]
    FetchFailed(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Invalid version number '{0}': {1}")]
    ParseFailed(String, String),

    /// Semver error
    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}
