//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use super::defaults::{
    DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_DATE_FORMAT, DEFAULT_OUTPUT_FILE,
    DEFAULT_TOKEN_ENV, DEFAULT_WEB_URL,
};
use crate::error::ConfigError;

/// Main configuration for prlog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Git configuration
    pub git: GitConfig,

    /// GitHub API configuration
    pub github: GitHubConfig,

    /// Skip local git state checks
    pub sloppy: bool,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// strftime-style format for the release date
    pub date_format: Option<String>,

    /// Labels that produce changelog sections, in display order
    pub valid_labels: Option<Vec<ValidLabelEntry>>,

    /// Title patterns that classify pull requests
    pub pr_title_matcher: Option<Vec<TitleMatcherConfig>>,

    /// Whether to render pull request descriptions
    pub include_pr_body: bool,

    /// File the changelog is prepended to
    pub output_file: PathBuf,

    /// Drop pull requests merged before this date
    pub only_since: Option<String>,

    /// Group pull requests under their label
    pub group_by_labels: bool,

    /// Group pull requests under their title matcher
    pub group_by_matchers: bool,

    /// Pull request numbers to leave out
    pub exclude_prs: Vec<u64>,

    /// Leave out pull requests whose title matches this pattern
    pub exclude_pattern: Option<String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            date_format: None,
            valid_labels: None,
            pr_title_matcher: None,
            include_pr_body: false,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            only_since: None,
            group_by_labels: true,
            group_by_matchers: true,
            exclude_prs: Vec::new(),
            exclude_pattern: None,
        }
    }
}

impl ChangelogConfig {
    /// The configured date format, or the built-in default
    pub fn date_format(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }
}

/// One entry of the valid-label table
///
/// Either a bare label key, displayed capitalized, or a key with an explicit
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidLabelEntry {
    /// Bare label key
    Key(String),
    /// Label key with display name
    Named {
        /// Label key as it appears on pull requests
        label: String,
        /// Section heading
        name: String,
    },
}

impl ValidLabelEntry {
    /// Label key as it appears on pull requests
    pub fn key(&self) -> &str {
        match self {
            Self::Key(key) => key,
            Self::Named { label, .. } => label,
        }
    }
}

/// A title matcher as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleMatcherConfig {
    /// Bare pattern, case-insensitive, no group label
    Pattern(String),
    /// Pattern with optional flags and group label
    Detailed {
        /// Regular expression source
        regexp: String,
        /// Flag letters (`i`, `m`, `s`, `x`)
        #[serde(default)]
        flags: Option<String>,
        /// Section heading for matching pull requests
        #[serde(default)]
        label: Option<String>,
    },
}

impl TitleMatcherConfig {
    /// Regular expression source
    pub fn pattern(&self) -> &str {
        match self {
            Self::Pattern(pattern) => pattern,
            Self::Detailed { regexp, .. } => regexp,
        }
    }

    /// Explicit flags, if any
    pub fn flags(&self) -> Option<&str> {
        match self {
            Self::Pattern(_) => None,
            Self::Detailed { flags, .. } => flags.as_deref(),
        }
    }

    /// Group label, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Pattern(_) => None,
            Self::Detailed { label, .. } => label.as_deref(),
        }
    }
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote name
    pub remote: String,

    /// Branch to release from
    pub branch: String,

    /// Only `<tag_prefix>@x.y.z` tags mark previous releases
    pub tag_prefix: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            tag_prefix: None,
        }
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: String,

    /// Web URL of the GitHub instance; its host is the one remotes must point at
    pub web_url: String,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Maximum number of concurrent API requests
    pub concurrency: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl GitHubConfig {
    /// Host name of `web_url`
    pub fn web_host(&self) -> Result<String, ConfigError> {
        Url::parse(&self.web_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| ConfigError::invalid("github.web_url", "must be an absolute URL"))
    }
}
