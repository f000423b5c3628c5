//! Merged pull request discovery

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{TimeZone, Utc};
use git2::Sort;
use regex::Regex;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::MergeCommit;

/// Subject of a merge commit created by the "Merge pull request" button
static MERGE_SUBJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(?P<id>\d+) from \S+").expect("Invalid regex")
});

/// Subject of a squash or rebase merge, e.g. "Add thing (#42)"
static SQUASH_SUBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(?P<id>\d+)\)\s*$").expect("Invalid regex"));

/// Extract the pull request number from a commit subject
pub fn parse_pull_request_id(subject: &str) -> Option<u64> {
    MERGE_SUBJECT_REGEX
        .captures(subject)
        .or_else(|| SQUASH_SUBJECT_REGEX.captures(subject))
        .and_then(|caps| caps.name("id"))
        .and_then(|id| id.as_str().parse().ok())
}

impl GitRepo {
    /// List pull requests merged into HEAD since `since_tag`, newest first.
    ///
    /// With no tag the whole history is scanned. A pull request referenced by
    /// several commits is reported once, for its most recent commit.
    #[instrument(skip(self))]
    pub fn merged_pull_requests(&self, since_tag: Option<&str>) -> Result<Vec<MergeCommit>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        if let Some(tag) = since_tag {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", tag))?;
            revwalk.hide(reference.peel_to_commit()?.id())?;
        }

        let mut seen = HashSet::new();
        let mut merges = Vec::new();

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let subject = commit.summary().unwrap_or_default();

            let Some(pull_request) = parse_pull_request_id(subject) else {
                continue;
            };
            if !seen.insert(pull_request) {
                continue;
            }

            let timestamp = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_else(Utc::now);

            merges.push(MergeCommit {
                pull_request,
                hash: commit.id().to_string(),
                subject: subject.to_string(),
                timestamp,
            });
        }

        debug!(count = merges.len(), since_tag, "found merged pull requests");
        Ok(merges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Repository, Signature};
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str, parents: &[Oid]) -> Oid {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_parse_pull_request_id() {
        assert_eq!(
            parse_pull_request_id("Merge pull request #42 from octocat/feature"),
            Some(42)
        );
        assert_eq!(parse_pull_request_id("Add parser support (#7)"), Some(7));
        assert_eq!(parse_pull_request_id("Merge branch 'main' into dev"), None);
        assert_eq!(parse_pull_request_id("Fix #12 in the middle"), None);
    }

    #[test]
    fn test_merged_pull_requests_since_tag() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let first = commit(&repo, "Merge pull request #1 from a/one", &[]);
        let tagged = repo.find_commit(first).unwrap();
        repo.tag_lightweight("v1.0.0", tagged.as_object(), false)
            .unwrap();

        let second = commit(&repo, "Merge pull request #2 from a/two", &[first]);
        let third = commit(&repo, "chore: housekeeping", &[second]);
        commit(&repo, "Add widgets (#3)", &[third]);

        let git_repo = GitRepo::open(temp.path()).unwrap();

        let merges = git_repo.merged_pull_requests(Some("v1.0.0")).unwrap();
        let ids: Vec<u64> = merges.iter().map(|m| m.pull_request).collect();
        assert_eq!(ids, vec![3, 2]);

        let all = git_repo.merged_pull_requests(None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_repeated_reference_reported_once() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let first = commit(&repo, "Add widgets (#5)", &[]);
        commit(&repo, "Merge pull request #5 from a/widgets", &[first]);

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let merges = git_repo.merged_pull_requests(None).unwrap();
        assert_eq!(merges.len(), 1);
        assert!(merges[0].subject.starts_with("Merge pull request"));
    }
}
