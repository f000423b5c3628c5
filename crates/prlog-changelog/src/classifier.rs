//! Pull request classification
//!
//! A pull request is associated with at most one label and at most one title
//! matcher:
//! - the label is the first label *on the pull request* (in the order the API
//!   reports them) that is a key of the valid-label table;
//! - the matcher is the first matcher, in declaration order, whose pattern
//!   matches the title.

use prlog_core::PullRequest;

use crate::options::{TitleMatcher, ValidLabels};
use crate::types::ClassifiedPullRequest;

/// Classify a single pull request
pub fn classify(
    pr: &PullRequest,
    valid_labels: &ValidLabels,
    matchers: &[TitleMatcher],
) -> ClassifiedPullRequest {
    let label = pr
        .labels
        .iter()
        .find(|label| valid_labels.contains(label))
        .cloned();

    let matched = matchers.iter().find(|m| m.is_match(&pr.title));

    ClassifiedPullRequest {
        pull_request: pr.clone(),
        label,
        matcher: matched.and_then(|m| m.label()).map(str::to_string),
        title_matched: matched.is_some(),
    }
}
