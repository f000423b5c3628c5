//! prlog-github: pull request records from the GitHub REST API

pub mod client;
pub mod error;

pub use client::{fetch_pull_requests, GitHubClient, PullRequestSource};
pub use error::{GitHubError, Result};
