//! Core types for prlog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// A merged pull request as retrieved from the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub id: u64,
    /// Title
    pub title: String,
    /// Description body
    pub body: Option<String>,
    /// Label names, in the order the API returned them
    pub labels: Vec<String>,
    /// Merge timestamp
    pub merged_at: DateTime<Utc>,
}

impl PullRequest {
    /// Create a new pull request without body or labels
    pub fn new(id: u64, title: impl Into<String>, merged_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            body: None,
            labels: Vec::new(),
            merged_at,
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the labels, dropping repeated names
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.clear();
        for label in labels {
            let label = label.into();
            if !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
        self
    }
}

/// Check that a version number is a valid semantic version
pub fn validate_version(version: &str) -> Result<semver::Version, VersionError> {
    semver::Version::parse(version)
        .map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()))
}
