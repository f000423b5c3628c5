//! Changelog generation

use tracing::{debug, info, instrument};

use prlog_core::{PullRequest, RepoId};

use crate::classifier::classify;
use crate::clock::Clock;
use crate::formatter::{ChangelogFormatter, MarkdownFormatter};
use crate::grouping::group;
use crate::options::ChangelogOptions;
use crate::types::{ChangelogEntry, ClassifiedPullRequest, Group};

/// Changelog generator
pub struct ChangelogGenerator {
    options: ChangelogOptions,
    formatter: Box<dyn ChangelogFormatter>,
}

impl ChangelogGenerator {
    /// Create a new generator with the markdown formatter
    pub fn new(options: ChangelogOptions) -> Self {
        Self {
            options,
            formatter: Box::new(MarkdownFormatter::new()),
        }
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Resolved options
    pub fn options(&self) -> &ChangelogOptions {
        &self.options
    }

    /// Apply the exclusion list, exclusion pattern and cutoff date
    fn is_candidate(&self, pr: &PullRequest) -> bool {
        if self.options.exclude_prs.contains(&pr.id) {
            debug!(id = pr.id, "excluded by number");
            return false;
        }
        if let Some(pattern) = &self.options.exclude_pattern {
            if pattern.is_match(&pr.title) {
                debug!(id = pr.id, "excluded by title pattern");
                return false;
            }
        }
        if let Some(since) = self.options.only_since {
            if pr.merged_at < since {
                debug!(id = pr.id, merged_at = %pr.merged_at, "merged before cutoff");
                return false;
            }
        }
        true
    }

    /// Classify and group pull requests
    pub fn build_groups(&self, pull_requests: &[PullRequest]) -> Vec<Group> {
        let classified: Vec<ClassifiedPullRequest> = pull_requests
            .iter()
            .filter(|pr| self.is_candidate(pr))
            .map(|pr| classify(pr, &self.options.valid_labels, &self.options.matchers))
            .collect();

        group(classified, &self.options.grouping())
    }

    /// Build a changelog entry; `version = None` produces an unreleased section
    #[instrument(skip(self, pull_requests, repo, clock), fields(pr_count = pull_requests.len()))]
    pub fn build_entry(
        &self,
        version: Option<&str>,
        pull_requests: &[PullRequest],
        repo: &RepoId,
        clock: &dyn Clock,
    ) -> ChangelogEntry {
        info!(?version, pr_count = pull_requests.len(), "generating changelog entry");

        let entry = ChangelogEntry {
            version: version.map(str::to_string),
            date: clock.now(),
            repo: repo.clone(),
            groups: self.build_groups(pull_requests),
        };

        debug!(
            group_count = entry.groups.len(),
            included = entry.pull_request_count(),
            "changelog groups built"
        );
        entry
    }

    /// Format a changelog entry to string
    pub fn format(&self, entry: &ChangelogEntry) -> String {
        self.formatter.format(entry, &self.options.render())
    }

    /// Generate and format in one step
    pub fn generate(
        &self,
        version: Option<&str>,
        pull_requests: &[PullRequest],
        repo: &RepoId,
        clock: &dyn Clock,
    ) -> String {
        let entry = self.build_entry(version, pull_requests, repo, clock);
        let output = self.format(&entry);
        debug!(output_len = output.len(), "changelog formatted");
        output
    }
}
