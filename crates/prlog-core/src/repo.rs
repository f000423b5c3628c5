//! Repository identifier

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

const GITHUB_HOST: &str = "github.com";

/// Owner/name pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    /// Create a new identifier
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Derive the identifier from a github.com remote URL
    pub fn from_remote_url(remote_url: &str) -> Result<Self, ConfigError> {
        Self::from_remote_url_on_host(remote_url, GITHUB_HOST)
    }

    /// Derive the identifier from a remote URL that must point at `host`
    ///
    /// Accepts scp-like (`git@host:owner/name.git`) and URL forms
    /// (`https://`, `http://`, `ssh://`, `git://`).
    pub fn from_remote_url_on_host(remote_url: &str, host: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidRemoteUrl(remote_url.to_string());
        let trimmed = remote_url.trim();
        let scp_prefix = format!("git@{}:", host);

        let path = if let Some(rest) = trimmed.strip_prefix(scp_prefix.as_str()) {
            rest.to_string()
        } else {
            let url = Url::parse(trimmed).map_err(|_| invalid())?;
            if !url.host_str().is_some_and(|h| h.eq_ignore_ascii_case(host)) {
                return Err(invalid());
            }
            url.path().to_string()
        };

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let mut parts = path.split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(invalid()),
        }
    }

    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
