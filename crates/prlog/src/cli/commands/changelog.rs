//! Changelog command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::{debug, info, warn};

use prlog_changelog::{
    ChangelogGenerator, ChangelogOptions, JsonFormatter, MarkdownFormatter, SystemClock,
};
use prlog_core::config::{
    load_config_or_default, validate_config, Config, TitleMatcherConfig, ValidLabelEntry,
};
use prlog_core::{validate_version, RepoId};
use prlog_git::GitRepo;
use prlog_github::{fetch_pull_requests, GitHubClient};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Generate a changelog section from the pull requests merged since the last tag
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Version of the release; omitted for an unreleased section
    #[arg(long, value_name = "SEMVER")]
    pub target_version: Option<String>,

    /// Skip the clean working tree and up-to-date branch checks
    #[arg(long)]
    pub sloppy: bool,

    /// Render each pull request's description
    #[arg(long)]
    pub include_pr_description: bool,

    /// Title pattern replacing the configured matchers; repeat for several
    #[arg(long, value_name = "REGEX")]
    pub pr_title_matcher: Vec<String>,

    /// Use no title matchers; with `--valid-labels ""` every pull request is kept
    #[arg(long, conflicts_with = "pr_title_matcher")]
    pub no_pr_title_matchers: bool,

    /// Only `<PREFIX>@x.y.z` tags mark the previous release
    #[arg(long, value_name = "PREFIX")]
    pub tag_prefix: Option<String>,

    /// strftime format for the release date
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Comma-separated label keys, highest priority first
    #[arg(long, value_name = "LABELS", value_delimiter = ',')]
    pub valid_labels: Option<Vec<String>>,

    /// Changelog file to prepend to
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Drop pull requests merged before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub only_since: Option<String>,

    /// Group pull requests by label
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub group_by_labels: Option<bool>,

    /// Group pull requests by title matcher
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub group_by_matchers: Option<bool>,

    /// Print the changelog instead of writing the output file
    #[arg(long, conflicts_with = "no_output")]
    pub output_to_stdout: bool,

    /// Generate the changelog but write it nowhere
    #[arg(long)]
    pub no_output: bool,

    /// Comma-separated pull request numbers to leave out
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub exclude_prs: Vec<u64>,

    /// Leave out pull requests whose title matches
    #[arg(long, value_name = "REGEX")]
    pub exclude_pattern: Option<String>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.target_version, sloppy = self.sloppy, "executing changelog command");
        let cwd = std::env::current_dir()?;

        let (mut config, config_path) = load_config_or_default(&cwd)?;
        if let Some(path) = &config_path {
            debug!(path = %path.display(), "loaded configuration");
        }
        self.apply_overrides(&mut config);
        validate_config(&config)?;
        let options = ChangelogOptions::resolve(&config.changelog)?;

        let version = self
            .target_version
            .as_deref()
            .map(validate_version)
            .transpose()
            .context("invalid --target-version")?
            .map(|v| v.to_string());

        let repo = GitRepo::discover(&cwd)?;
        if config.sloppy {
            warn!("sloppy mode, skipping local state checks");
        } else {
            repo.ensure_clean_local_state(&config.git.remote, &config.git.branch)?;
        }

        let remote_url = repo.remote_url(&config.git.remote)?;
        let repo_id = RepoId::from_remote_url_on_host(&remote_url, &config.github.web_host()?)?;

        let latest_tag = repo.find_latest_tag(config.git.tag_prefix.as_deref())?;
        let merges = repo.merged_pull_requests(latest_tag.as_ref().map(|t| t.name.as_str()))?;
        let ids: Vec<u64> = merges.iter().map(|m| m.pull_request).collect();
        info!(
            repo = %repo_id,
            tag = ?latest_tag.as_ref().map(|t| &t.name),
            count = ids.len(),
            "found merged pull requests"
        );

        if ids.is_empty() {
            if !cli.quiet {
                output::warning("No pull requests merged since the last release.");
            }
            return Ok(());
        }

        let client = Arc::new(GitHubClient::from_config(&config.github)?);
        let runtime = tokio::runtime::Runtime::new()?;
        let pull_requests = runtime
            .block_on(fetch_pull_requests(
                client,
                &repo_id,
                &ids,
                config.github.concurrency,
            ))
            .with_context(|| format!("failed to fetch pull requests from {}", repo_id))?;

        let clock = SystemClock;
        let generator = ChangelogGenerator::new(options);

        if cli.format == OutputFormat::Json {
            let generator = generator.with_formatter(JsonFormatter);
            let json = generator.generate(version.as_deref(), &pull_requests, &repo_id, &clock);
            if !self.no_output {
                print!("{}", json);
            }
            return Ok(());
        }

        let generator =
            generator.with_formatter(MarkdownFormatter::new().with_web_url(&config.github.web_url));
        let changelog = collapse_trailing_blank_line(generator.generate(
            version.as_deref(),
            &pull_requests,
            &repo_id,
            &clock,
        ));

        if self.no_output {
            debug!("--no-output set, discarding changelog");
        } else if self.output_to_stdout {
            print!("{}", changelog);
        } else {
            let output_path = cwd.join(&config.changelog.output_file);
            prepend_to_file(&output_path, &changelog)?;

            if !cli.quiet {
                output::success(&format!(
                    "Changelog written to {}",
                    output::path_style().apply_to(output_path.display())
                ));
            }
        }

        Ok(())
    }

    /// Apply command-line flags on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        let changelog = &mut config.changelog;

        if let Some(format) = &self.date_format {
            changelog.date_format = Some(format.clone());
        }
        if let Some(labels) = &self.valid_labels {
            changelog.valid_labels = Some(
                labels
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty())
                    .map(|l| ValidLabelEntry::Key(l.to_string()))
                    .collect(),
            );
        }
        if self.no_pr_title_matchers {
            changelog.pr_title_matcher = Some(Vec::new());
        } else if !self.pr_title_matcher.is_empty() {
            changelog.pr_title_matcher = Some(
                self.pr_title_matcher
                    .iter()
                    .map(|p| TitleMatcherConfig::Pattern(p.clone()))
                    .collect(),
            );
        }
        if self.include_pr_description {
            changelog.include_pr_body = true;
        }
        if let Some(path) = &self.output_file {
            changelog.output_file = path.clone();
        }
        if let Some(since) = &self.only_since {
            changelog.only_since = Some(since.clone());
        }
        if let Some(value) = self.group_by_labels {
            changelog.group_by_labels = value;
        }
        if let Some(value) = self.group_by_matchers {
            changelog.group_by_matchers = value;
        }
        for id in &self.exclude_prs {
            if !changelog.exclude_prs.contains(id) {
                changelog.exclude_prs.push(*id);
            }
        }
        if let Some(pattern) = &self.exclude_pattern {
            changelog.exclude_pattern = Some(pattern.clone());
        }
        if let Some(prefix) = &self.tag_prefix {
            config.git.tag_prefix = Some(prefix.clone());
        }
        if self.sloppy {
            config.sloppy = true;
        }
    }
}

/// Reduce a trailing blank line to a single newline
fn collapse_trailing_blank_line(mut changelog: String) -> String {
    if changelog.ends_with("\n\n") {
        changelog.pop();
    }
    changelog
}

/// Write `changelog` above the existing content, separated by a blank line
fn prepend_to_file(path: &Path, changelog: &str) -> anyhow::Result<()> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    } else {
        String::new()
    };

    let combined = if existing.trim().is_empty() {
        changelog.to_string()
    } else {
        format!("{}\n{}", changelog, existing)
    };

    std::fs::write(path, combined).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "changelog prepended");
    Ok(())
}
