//! Configuration validation
//!
//! Everything that can be wrong with a configuration is detected here, before
//! any pull request is looked at.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::ConfigError;

use super::types::{ChangelogConfig, Config};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    debug!("validating configuration");
    validate_changelog(&config.changelog)?;
    validate_git(config)?;
    validate_github(config)?;
    debug!("configuration validation passed");
    Ok(())
}

/// Compile a title pattern.
///
/// Without `flags` the pattern is case-insensitive. An explicit flag string is
/// applied verbatim, so `Some("")` yields a case-sensitive pattern.
pub fn compile_pattern(
    field: &str,
    pattern: &str,
    flags: Option<&str>,
) -> Result<Regex, ConfigError> {
    let mut builder = RegexBuilder::new(pattern);

    match flags {
        None => {
            builder.case_insensitive(true);
        }
        Some(flags) => {
            for flag in flags.chars() {
                match flag {
                    'i' => {
                        builder.case_insensitive(true);
                    }
                    'm' => {
                        builder.multi_line(true);
                    }
                    's' => {
                        builder.dot_matches_new_line(true);
                    }
                    'x' => {
                        builder.ignore_whitespace(true);
                    }
                    // no meaning for a single is_match test
                    'g' | 'u' | 'y' => {}
                    other => {
                        return Err(ConfigError::InvalidPattern {
                            field: field.to_string(),
                            pattern: pattern.to_string(),
                            message: format!("unsupported flag '{}'", other),
                        });
                    }
                }
            }
        }
    }

    builder.build().map_err(|e| ConfigError::InvalidPattern {
        field: field.to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Parse an "only since" cutoff: `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn parse_only_since(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ConfigError::InvalidDate(value.to_string()))
}

/// Check that a strftime format string only contains known specifiers
pub fn validate_date_format(format: &str) -> Result<(), ConfigError> {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::invalid(
            "changelog.date_format",
            format!("'{}' is not a valid date format", format),
        ));
    }
    Ok(())
}

fn validate_changelog(config: &ChangelogConfig) -> Result<(), ConfigError> {
    validate_date_format(config.date_format())?;

    if let Some(labels) = &config.valid_labels {
        for (i, entry) in labels.iter().enumerate() {
            if entry.key().trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("changelog.valid_labels[{}]", i),
                    "label cannot be empty",
                ));
            }
            if labels[..i].iter().any(|other| other.key() == entry.key()) {
                return Err(ConfigError::invalid(
                    format!("changelog.valid_labels[{}]", i),
                    format!("duplicate label '{}'", entry.key()),
                ));
            }
        }
    }

    if let Some(matchers) = &config.pr_title_matcher {
        debug!(count = matchers.len(), "validating title matchers");
        for (i, matcher) in matchers.iter().enumerate() {
            compile_pattern(
                &format!("changelog.pr_title_matcher[{}]", i),
                matcher.pattern(),
                matcher.flags(),
            )?;
        }
    }

    if let Some(pattern) = &config.exclude_pattern {
        compile_pattern("changelog.exclude_pattern", pattern, None)?;
    }

    if let Some(since) = &config.only_since {
        parse_only_since(since)?;
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<(), ConfigError> {
    if config.git.remote.is_empty() {
        return Err(ConfigError::invalid("git.remote", "remote cannot be empty"));
    }

    if config.git.branch.is_empty() {
        return Err(ConfigError::invalid("git.branch", "branch cannot be empty"));
    }

    if let Some(prefix) = &config.git.tag_prefix {
        if prefix.is_empty() || prefix.ends_with('@') {
            return Err(ConfigError::invalid(
                "git.tag_prefix",
                "must be the tool name, without the trailing '@'",
            ));
        }
    }

    Ok(())
}

fn validate_github(config: &Config) -> Result<(), ConfigError> {
    if config.github.concurrency == 0 {
        return Err(ConfigError::invalid(
            "github.concurrency",
            "must be at least 1",
        ));
    }

    if config.github.api_url.is_empty() {
        return Err(ConfigError::invalid("github.api_url", "cannot be empty"));
    }

    config.github.web_host()?;

    Ok(())
}
