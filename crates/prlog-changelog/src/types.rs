//! Changelog types

use chrono::{DateTime, Utc};
use prlog_core::{PullRequest, RepoId};
use serde::Serialize;

/// A pull request annotated with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedPullRequest {
    /// The pull request as fetched
    #[serde(flatten)]
    pub pull_request: PullRequest,
    /// First label on the pull request that is in the valid-label table
    pub label: Option<String>,
    /// Group label of the first title matcher that matched
    pub matcher: Option<String>,
    /// Whether any title matcher matched, labelled or not
    pub title_matched: bool,
}

impl ClassifiedPullRequest {
    /// Whether the pull request qualifies for a filtered changelog
    pub fn is_matched(&self) -> bool {
        self.label.is_some() || self.title_matched
    }
}

/// A changelog section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Section heading; `None` for the ungrouped bucket
    pub name: Option<String>,
    /// Pull requests, most recently merged first
    pub pull_requests: Vec<ClassifiedPullRequest>,
}

impl Group {
    /// Create a named group
    pub fn named(name: impl Into<String>, pull_requests: Vec<ClassifiedPullRequest>) -> Self {
        Self {
            name: Some(name.into()),
            pull_requests,
        }
    }

    /// Create the anonymous group
    pub fn anonymous(pull_requests: Vec<ClassifiedPullRequest>) -> Self {
        Self {
            name: None,
            pull_requests,
        }
    }

    /// Check if group is empty
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty()
    }

    /// Sort pull requests by merge time, newest first
    pub(crate) fn sort_by_merge_time(&mut self) {
        self.pull_requests
            .sort_by(|a, b| b.pull_request.merged_at.cmp(&a.pull_request.merged_at));
    }
}

/// A changelog section for one release
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogEntry {
    /// Version string; `None` for an unreleased section
    pub version: Option<String>,
    /// Release date
    pub date: DateTime<Utc>,
    /// Repository the pull requests belong to
    pub repo: RepoId,
    /// Ordered groups
    pub groups: Vec<Group>,
}

impl ChangelogEntry {
    /// Number of pull requests across all groups
    pub fn pull_request_count(&self) -> usize {
        self.groups.iter().map(|g| g.pull_requests.len()).sum()
    }

    /// Check if entry has any content
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Group::is_empty)
    }
}
