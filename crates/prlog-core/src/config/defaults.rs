//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "prlog.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "prlog.yaml";

/// Default changelog file
pub const DEFAULT_OUTPUT_FILE: &str = "CHANGELOG.md";

/// Default release date format, e.g. "January 1, 1970"
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default web URL pull request links point at
pub const DEFAULT_WEB_URL: &str = "https://github.com";

/// Default environment variable holding the GitHub token
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Default number of concurrent GitHub requests
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Built-in valid-label table: (label key, section heading)
pub const DEFAULT_VALID_LABELS: &[(&str, &str)] = &[
    ("bug", "Bug Fixes"),
    ("upgrade", "Dependency Upgrades"),
    ("documentation", "Documentation"),
    ("feature", "Features"),
    ("enhancement", "Enhancements"),
    ("build", "Build-Related"),
    ("breaking", "Breaking Changes"),
];

/// Built-in title matchers: (pattern, section heading)
pub const DEFAULT_TITLE_MATCHERS: &[(&str, &str)] = &[
    (r"^(?:feat|feature)[:/(]", "Features"),
    (r"^(?:fix|bugfix)[:/(]", "Bug Fixes"),
];

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".prlog.toml",
        ".prlog.yaml",
    ]
}
