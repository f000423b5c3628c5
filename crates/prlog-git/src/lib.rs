//! prlog Git - local repository inspection
//!
//! This crate checks the local git state before a release, resolves the
//! remote URL, finds the latest release tag and lists the pull requests that
//! were merged since then.

mod merges;
mod remote;
mod repository;
mod status;
mod tags;
pub mod types;

pub use merges::parse_pull_request_id;
pub use remote::git_fetch;
pub use repository::{GitRepo, Result};
pub use types::{MergeCommit, TagInfo};
