//! GitHub client error types

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;

/// GitHub API errors
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Pull request does not exist
    #[error("Pull request {repo}#{id} not found")]
    NotFound { repo: String, id: u64 },

    /// Rate limit exhausted
    #[error("GitHub API rate limit exceeded; set a token to raise the limit")]
    RateLimited,

    /// Non-success response
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Pull request was closed without merging, or is still open
    #[error("Pull request {repo}#{id} is not merged")]
    NotMerged { repo: String, id: u64 },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not decode
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// Fetch task panicked or was cancelled
    #[error("Fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
