//! JSON changelog formatter

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ChangelogFormatter, RenderOptions};
use crate::types::ChangelogEntry;

/// JSON formatter for machine consumption
#[derive(Debug, Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonEntry<'a> {
    version: Option<&'a str>,
    date: String,
    repository: String,
    groups: Vec<JsonGroup<'a>>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    name: Option<&'a str>,
    pull_requests: Vec<JsonPullRequest<'a>>,
}

#[derive(Serialize)]
struct JsonPullRequest<'a> {
    id: u64,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    labels: &'a [String],
    merged_at: DateTime<Utc>,
    label: Option<&'a str>,
    matcher: Option<&'a str>,
}

impl ChangelogFormatter for JsonFormatter {
    fn format(&self, entry: &ChangelogEntry, options: &RenderOptions) -> String {
        let view = JsonEntry {
            version: entry.version.as_deref(),
            date: entry.date.format(&options.date_format).to_string(),
            repository: entry.repo.path(),
            groups: entry
                .groups
                .iter()
                .filter(|g| !g.is_empty())
                .map(|g| JsonGroup {
                    name: g.name.as_deref(),
                    pull_requests: g
                        .pull_requests
                        .iter()
                        .map(|c| JsonPullRequest {
                            id: c.pull_request.id,
                            title: &c.pull_request.title,
                            body: if options.include_body {
                                c.pull_request.body.as_deref()
                            } else {
                                None
                            },
                            labels: &c.pull_request.labels,
                            merged_at: c.pull_request.merged_at,
                            label: c.label.as_deref(),
                            matcher: c.matcher.as_deref(),
                        })
                        .collect(),
                })
                .collect(),
        };

        let mut output = serde_json::to_string_pretty(&view).unwrap_or_default();
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassifiedPullRequest, Group};
    use chrono::TimeZone;
    use prlog_core::{PullRequest, RepoId};

    #[test]
    fn test_format_json() {
        let pr = PullRequest::new(4, "feat: widgets", Utc.timestamp_opt(0, 0).unwrap())
            .with_body("secret details")
            .with_labels(["feature"]);
        let entry = ChangelogEntry {
            version: Some("2.0.0".to_string()),
            date: Utc.timestamp_opt(0, 0).unwrap(),
            repo: RepoId::new("octocat", "hello-world"),
            groups: vec![Group::named(
                "Features",
                vec![ClassifiedPullRequest {
                    pull_request: pr,
                    label: Some("feature".to_string()),
                    matcher: Some("Features".to_string()),
                    title_matched: true,
                }],
            )],
        };
        let options = RenderOptions {
            date_format: "%Y-%m-%d".to_string(),
            include_body: false,
        };

        let output = JsonFormatter.format(&entry, &options);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["version"], "2.0.0");
        assert_eq!(value["date"], "1970-01-01");
        assert_eq!(value["repository"], "octocat/hello-world");
        assert_eq!(value["groups"][0]["name"], "Features");
        assert_eq!(value["groups"][0]["pull_requests"][0]["id"], 4);
        assert!(value["groups"][0]["pull_requests"][0].get("body").is_none());
    }
}
