//! Resolved changelog options
//!
//! [`ChangelogOptions::resolve`] turns the user-facing [`ChangelogConfig`]
//! into everything the pipeline needs: the ordered valid-label table, the
//! compiled title matchers and the pre-filters. All configuration errors
//! surface here, before any pull request is processed.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use prlog_core::config::{
    compile_pattern, parse_only_since, validate_date_format, ChangelogConfig, ValidLabelEntry,
    DEFAULT_DATE_FORMAT, DEFAULT_TITLE_MATCHERS, DEFAULT_VALID_LABELS,
};
use prlog_core::ConfigError;

use crate::formatter::RenderOptions;
use crate::grouping::GroupingOptions;

static BUILTIN_MATCHERS: LazyLock<Vec<TitleMatcher>> = LazyLock::new(|| {
    DEFAULT_TITLE_MATCHERS
        .iter()
        .map(|(pattern, label)| {
            TitleMatcher::compile(pattern, None, Some(*label)).expect("Invalid regex")
        })
        .collect()
});

/// Upper-case the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A label key and its section heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidLabel {
    /// Label as it appears on pull requests
    pub key: String,
    /// Section heading
    pub name: String,
}

/// Ordered valid-label table; order is display priority
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidLabels {
    labels: Vec<ValidLabel>,
}

impl ValidLabels {
    /// Table of bare keys, each displayed capitalized
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for key in keys {
            let key = key.as_ref();
            table.push(key, capitalize(key));
        }
        table
    }

    /// The built-in table
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (key, name) in DEFAULT_VALID_LABELS {
            table.push(*key, *name);
        }
        table
    }

    /// Build from configuration; `None` selects the built-in table
    pub fn from_config(entries: Option<&[ValidLabelEntry]>) -> Result<Self, ConfigError> {
        let Some(entries) = entries else {
            return Ok(Self::builtin());
        };

        let mut table = Self::default();
        for (i, entry) in entries.iter().enumerate() {
            if table.contains(entry.key()) {
                return Err(ConfigError::invalid(
                    format!("changelog.valid_labels[{}]", i),
                    format!("duplicate label '{}'", entry.key()),
                ));
            }
            match entry {
                ValidLabelEntry::Key(key) => table.push(key, capitalize(key)),
                ValidLabelEntry::Named { label, name } => table.push(label, name),
            }
        }
        Ok(table)
    }

    fn push(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.labels.push(ValidLabel {
            key: key.into(),
            name: name.into(),
        });
    }

    /// Priority of a label key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.key == key)
    }

    /// Check if a label key is in the table
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Section heading for a label key
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.name.as_str())
    }

    /// Iterate in priority order
    pub fn iter(&self) -> impl Iterator<Item = &ValidLabel> {
        self.labels.iter()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A compiled title pattern with an optional group label
#[derive(Debug, Clone)]
pub struct TitleMatcher {
    regex: Regex,
    label: Option<String>,
}

impl TitleMatcher {
    /// Wrap an already compiled pattern
    pub fn new(regex: Regex, label: Option<String>) -> Self {
        Self { regex, label }
    }

    /// Compile a pattern; see [`compile_pattern`] for flag handling
    pub fn compile(
        pattern: &str,
        flags: Option<&str>,
        label: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let regex = compile_pattern("changelog.pr_title_matcher", pattern, flags)?;
        Ok(Self::new(regex, label.map(str::to_string)))
    }

    /// The "Features" and "Bug Fixes" matchers
    pub fn builtin() -> Vec<Self> {
        BUILTIN_MATCHERS.clone()
    }

    /// Check a pull request title
    pub fn is_match(&self, title: &str) -> bool {
        self.regex.is_match(title)
    }

    /// Group label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Pattern source
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Everything the classify/group/render pipeline needs
#[derive(Debug, Clone)]
pub struct ChangelogOptions {
    /// Ordered valid-label table
    pub valid_labels: ValidLabels,
    /// Title matchers in declaration order
    pub matchers: Vec<TitleMatcher>,
    /// strftime format for the release date
    pub date_format: String,
    /// Render pull request descriptions
    pub include_body: bool,
    /// Group by label
    pub group_by_labels: bool,
    /// Group by title matcher
    pub group_by_matchers: bool,
    /// Drop pull requests merged before this instant
    pub only_since: Option<DateTime<Utc>>,
    /// Pull request numbers to drop
    pub exclude_prs: Vec<u64>,
    /// Drop pull requests whose title matches
    pub exclude_pattern: Option<Regex>,
}

impl Default for ChangelogOptions {
    fn default() -> Self {
        Self {
            valid_labels: ValidLabels::builtin(),
            matchers: TitleMatcher::builtin(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            include_body: false,
            group_by_labels: true,
            group_by_matchers: true,
            only_since: None,
            exclude_prs: Vec::new(),
            exclude_pattern: None,
        }
    }
}

impl ChangelogOptions {
    /// Resolve configuration against the built-in defaults
    pub fn resolve(config: &ChangelogConfig) -> Result<Self, ConfigError> {
        let date_format = config.date_format().to_string();
        validate_date_format(&date_format)?;

        let valid_labels = ValidLabels::from_config(config.valid_labels.as_deref())?;

        let matchers = match &config.pr_title_matcher {
            None => TitleMatcher::builtin(),
            Some(entries) => entries
                .iter()
                .map(|m| TitleMatcher::compile(m.pattern(), m.flags(), m.label()))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let only_since = config
            .only_since
            .as_deref()
            .map(parse_only_since)
            .transpose()?;

        let exclude_pattern = config
            .exclude_pattern
            .as_deref()
            .map(|p| compile_pattern("changelog.exclude_pattern", p, None))
            .transpose()?;

        debug!(
            labels = valid_labels.len(),
            matchers = matchers.len(),
            group_by_labels = config.group_by_labels,
            group_by_matchers = config.group_by_matchers,
            "resolved changelog options"
        );

        Ok(Self {
            valid_labels,
            matchers,
            date_format,
            include_body: config.include_pr_body,
            group_by_labels: config.group_by_labels,
            group_by_matchers: config.group_by_matchers,
            only_since,
            exclude_prs: config.exclude_prs.clone(),
            exclude_pattern,
        })
    }

    /// Whether unmatched pull requests are dropped.
    ///
    /// False only when both the label table and the matcher list are empty.
    pub fn is_filtering(&self) -> bool {
        !self.valid_labels.is_empty() || !self.matchers.is_empty()
    }

    /// Options for the grouping engine
    pub fn grouping(&self) -> GroupingOptions<'_> {
        GroupingOptions {
            group_by_labels: self.group_by_labels,
            group_by_matchers: self.group_by_matchers,
            filter_unmatched: self.is_filtering(),
            valid_labels: &self.valid_labels,
        }
    }

    /// Options for the renderer
    pub fn render(&self) -> RenderOptions {
        RenderOptions {
            date_format: self.date_format.clone(),
            include_body: self.include_body,
        }
    }
}
