//! Grouping engine
//!
//! Partitions classified pull requests into ordered groups keyed by their
//! heading: label groups in valid-label order, then matcher groups in
//! first-seen order, then the catch-all group. Labels are claimed before
//! matchers, so a pull request with both a valid label and a matching title is
//! grouped by its label. A matcher whose heading equals a label group's heading
//! feeds that label group.

use tracing::debug;

use crate::options::{capitalize, ValidLabels};
use crate::types::{ClassifiedPullRequest, Group};

/// Heading of the catch-all group when named groups exist
pub const OTHER_GROUP: &str = "Other";

/// Inputs of the grouping engine
#[derive(Debug, Clone, Copy)]
pub struct GroupingOptions<'a> {
    /// Group by label
    pub group_by_labels: bool,
    /// Group by title matcher
    pub group_by_matchers: bool,
    /// Drop pull requests that matched neither a label nor a title pattern
    pub filter_unmatched: bool,
    /// Ordered valid-label table
    pub valid_labels: &'a ValidLabels,
}

enum GroupKey {
    /// Heading and table priority
    Label(String, usize),
    Matcher(String),
    Rest,
}

fn group_key(pr: &ClassifiedPullRequest, options: &GroupingOptions<'_>) -> GroupKey {
    if options.group_by_labels {
        if let Some(label) = &pr.label {
            let table = options.valid_labels;
            let name = table
                .display_name(label)
                .map(str::to_string)
                .unwrap_or_else(|| capitalize(label));
            return GroupKey::Label(name, table.position(label).unwrap_or(usize::MAX));
        }
    }
    if options.group_by_matchers {
        if let Some(matcher) = &pr.matcher {
            return GroupKey::Matcher(matcher.clone());
        }
    }
    GroupKey::Rest
}

/// A named group under construction
struct Bucket {
    name: String,
    rank: usize,
    pull_requests: Vec<ClassifiedPullRequest>,
}

/// Append to the bucket headed `name`, creating it on first encounter
fn push_named(
    buckets: &mut Vec<Bucket>,
    name: String,
    rank: usize,
    prs: Vec<ClassifiedPullRequest>,
) {
    match buckets.iter_mut().find(|b| b.name == name) {
        Some(bucket) => {
            bucket.rank = bucket.rank.min(rank);
            bucket.pull_requests.extend(prs);
        }
        None => buckets.push(Bucket {
            name,
            rank,
            pull_requests: prs,
        }),
    }
}

/// Partition classified pull requests into ordered groups
pub fn group(
    classified: Vec<ClassifiedPullRequest>,
    options: &GroupingOptions<'_>,
) -> Vec<Group> {
    let total = classified.len();
    let mut label_buckets: Vec<Bucket> = Vec::new();
    let mut matcher_buckets: Vec<Bucket> = Vec::new();
    let mut rest = Vec::new();

    for pr in classified {
        if options.filter_unmatched && !pr.is_matched() {
            continue;
        }
        match group_key(&pr, options) {
            GroupKey::Label(name, rank) => {
                push_named(&mut label_buckets, name, rank, vec![pr])
            }
            GroupKey::Matcher(name) => push_named(&mut matcher_buckets, name, 0, vec![pr]),
            GroupKey::Rest => rest.push(pr),
        }
    }

    // stable: keys outside the table keep first-seen order after known keys
    label_buckets.sort_by_key(|b| b.rank);

    // matcher headings already used by a label group join it
    let mut named = label_buckets;
    for bucket in matcher_buckets {
        let rank = named.len();
        push_named(&mut named, bucket.name, rank, bucket.pull_requests);
    }

    let mut groups: Vec<Group> = Vec::with_capacity(named.len() + 1);
    let has_named = !named.is_empty();
    for bucket in named {
        groups.push(Group::named(bucket.name, bucket.pull_requests));
    }

    if !rest.is_empty() {
        if !has_named {
            groups.push(Group::anonymous(rest));
        } else if let Some(other) = groups
            .iter_mut()
            .find(|g| g.name.as_deref() == Some(OTHER_GROUP))
        {
            other.pull_requests.extend(rest);
        } else {
            groups.push(Group::named(OTHER_GROUP, rest));
        }
    }

    for group in &mut groups {
        group.sort_by_merge_time();
    }

    debug!(
        input = total,
        kept = groups.iter().map(|g| g.pull_requests.len()).sum::<usize>(),
        groups = groups.len(),
        "grouped pull requests"
    );
    groups
}
