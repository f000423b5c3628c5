//! prlog Core - shared types for the prlog changelog generator
//!
//! This crate provides the error types, configuration schema and loading,
//! and the repository identifier used by every other prlog crate.

pub mod config;
pub mod error;
pub mod repo;
pub mod types;

pub use error::{ConfigError, GitError, VersionError};
pub use repo::RepoId;
pub use types::{validate_version, PullRequest};
