//! Markdown changelog formatter

use tracing::{debug, instrument};

use super::{ChangelogFormatter, RenderOptions};
use crate::types::{ChangelogEntry, ClassifiedPullRequest};

/// Default web URL pull request links point at
const DEFAULT_WEB_URL: &str = "https://github.com";

/// Markdown changelog formatter
///
/// ```text
/// ## 1.2.0 (January 1, 1970)
///
/// ### Bug Fixes
///
/// - #### Fix crash on start ([#12](https://github.com/owner/name/pull/12))
///
/// ```
pub struct MarkdownFormatter {
    /// Web URL pull request links are built from
    pub web_url: String,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self {
            web_url: DEFAULT_WEB_URL.to_string(),
        }
    }

    /// Set the web URL for links (GitHub Enterprise)
    pub fn with_web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn format_pull_request(
        &self,
        output: &mut String,
        pr: &ClassifiedPullRequest,
        repo_path: &str,
        include_body: bool,
    ) {
        let pr = &pr.pull_request;
        output.push_str(&format!(
            "- #### {} ([#{}]({}/{}/pull/{}))\n\n",
            pr.title, pr.id, self.web_url, repo_path, pr.id
        ));

        if !include_body {
            return;
        }

        let Some(body) = pr.body.as_deref() else {
            return;
        };
        let body = body.replace("\r\n", "\n");
        let body = body.trim_end();
        if body.trim().is_empty() {
            return;
        }

        for line in body.split('\n') {
            output.push_str("  ");
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    #[instrument(skip(self, entry, options), fields(version = ?entry.version, group_count = entry.groups.len()))]
    fn format(&self, entry: &ChangelogEntry, options: &RenderOptions) -> String {
        let mut output = String::new();
        let repo_path = entry.repo.path();

        // Version header; an unreleased section has none
        if let Some(version) = &entry.version {
            let date_str = entry.date.format(&options.date_format).to_string();
            output.push_str(&format!("## {} ({})\n\n", version, date_str));
        }

        for group in &entry.groups {
            if group.is_empty() {
                continue;
            }

            if let Some(name) = &group.name {
                output.push_str(&format!("### {}\n\n", name));
            }

            for pr in &group.pull_requests {
                self.format_pull_request(&mut output, pr, &repo_path, options.include_body);
            }
        }

        debug!(output_len = output.len(), "markdown changelog formatted");
        output
    }
}
