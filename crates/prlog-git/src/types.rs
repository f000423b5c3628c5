//! Git types

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

/// A release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Tool or package name of `<tool>@<version>` tags
    pub prefix: Option<String>,
    /// Release version, if the name carries one
    pub version: Option<Version>,
}

impl TagInfo {
    /// Create a new TagInfo, parsing the release version out of the name
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        let (prefix, version) = match parse_release_tag(&name) {
            Some((prefix, version)) => (prefix.map(str::to_string), Some(version)),
            None => (None, None),
        };

        Self {
            name,
            commit_hash: commit_hash.into(),
            prefix,
            version,
        }
    }

    /// Whether this tag releases the tool named `prefix` (`None`: any tool)
    pub fn is_release_of(&self, prefix: Option<&str>) -> bool {
        self.version.is_some()
            && prefix.map_or(true, |p| self.prefix.as_deref() == Some(p))
    }
}

/// A commit on the release branch that brought in a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCommit {
    /// Pull request number referenced by the commit subject
    pub pull_request: u64,
    /// Commit hash (full)
    pub hash: String,
    /// Commit subject line
    pub subject: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

/// Split `[<tool>@][v]<semver>` into its tool prefix and version
fn parse_release_tag(tag: &str) -> Option<(Option<&str>, Version)> {
    let (prefix, rest) = match tag.rsplit_once('@') {
        Some((prefix, rest)) if !prefix.is_empty() => (Some(prefix), rest),
        Some(_) => return None,
        None => (None, tag),
    };
    let rest = rest
        .strip_prefix('v')
        .or_else(|| rest.strip_prefix('V'))
        .unwrap_or(rest);

    Version::parse(rest).ok().map(|version| (prefix, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_tag() {
        let (prefix, version) = parse_release_tag("v1.0.0").unwrap();
        assert_eq!(prefix, None);
        assert_eq!(version, Version::new(1, 0, 0));

        let (prefix, version) = parse_release_tag("prlog@2.3.1-rc.1").unwrap();
        assert_eq!(prefix, Some("prlog"));
        assert_eq!(version.to_string(), "2.3.1-rc.1");

        let (prefix, _) = parse_release_tag("@scope/pkg@v0.4.0").unwrap();
        assert_eq!(prefix, Some("@scope/pkg"));

        assert!(parse_release_tag("1.0").is_none());
        assert!(parse_release_tag("@1.0.0").is_none());
        assert!(parse_release_tag("nightly").is_none());
    }

    #[test]
    fn test_tag_info() {
        let tag = TagInfo::new("v3.1.4", "abc123");
        assert_eq!(tag.version, Some(Version::new(3, 1, 4)));
        assert_eq!(tag.commit_hash, "abc123");
        assert!(tag.is_release_of(None));
        assert!(!tag.is_release_of(Some("prlog")));

        let tag = TagInfo::new("prlog@1.0.0", "def456");
        assert!(tag.is_release_of(Some("prlog")));
        assert!(!tag.is_release_of(Some("other")));

        let tag = TagInfo::new("nightly", "abc123");
        assert!(!tag.is_release_of(None));
    }
}
