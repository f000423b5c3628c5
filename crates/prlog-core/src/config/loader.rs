//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ConfigError;

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find the configuration file for the checkout containing `start_dir`.
///
/// Each directory from `start_dir` upwards is searched, its `.github/`
/// subdirectory right after it. The walk ends at the first directory holding
/// `.git`, so a file above the work tree root is never picked up.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");

    for dir in start_dir.ancestors() {
        let candidates = [dir.to_path_buf(), dir.join(".github")];
        let found = candidates
            .iter()
            .flat_map(|base| config_file_names().into_iter().map(move |name| base.join(name)))
            .find(|path| path.is_file());

        if let Some(path) = found {
            info!(path = %path.display(), "found config file");
            return Some(path);
        }
        if dir.join(".git").exists() {
            debug!(root = %dir.display(), "reached work tree root");
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf), ConfigError> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration, falling back to defaults when no file exists.
///
/// A config file that exists but fails to parse or validate is an error.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>), ConfigError> {
    match load_config_from_dir(dir) {
        Ok((config, path)) => Ok((config, Some(path))),
        Err(ConfigError::NotFound(_)) => {
            warn!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("prlog.toml");
        std::fs::write(&config_path, "sloppy = true").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_toml_over_yaml() {
        let temp = TempDir::new().unwrap();
        let toml_path = temp.path().join("prlog.toml");
        let yaml_path = temp.path().join("prlog.yaml");
        std::fs::write(&toml_path, "sloppy = true").unwrap();
        std::fs::write(&yaml_path, "sloppy: false").unwrap();

        let found = find_config(temp.path()).unwrap();
        assert_eq!(found, toml_path);
    }

    #[test]
    fn test_find_config_in_github_dir() {
        let temp = TempDir::new().unwrap();
        let github_dir = temp.path().join(".github");
        std::fs::create_dir_all(&github_dir).unwrap();
        let config_path = github_dir.join("prlog.yaml");
        std::fs::write(&config_path, "sloppy: true").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".prlog.toml");
        std::fs::write(&config_path, "sloppy = true").unwrap();
        let nested = temp.path().join("crates").join("tool");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_work_tree_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("prlog.toml"), "sloppy = true").unwrap();
        let checkout = temp.path().join("checkout");
        std::fs::create_dir_all(checkout.join(".git")).unwrap();
        let nested = checkout.join("src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), None);
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("prlog.toml");
        std::fs::write(
            &config_path,
            r#"
[changelog]
date_format = "%Y-%m-%d"
valid_labels = ["bug", { label = "feature", name = "New Features" }]
pr_title_matcher = [{ regexp = "^docs", label = "Documentation" }]
group_by_matchers = false

[git]
branch = "master"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.changelog.date_format(), "%Y-%m-%d");
        assert_eq!(config.changelog.valid_labels.unwrap().len(), 2);
        assert!(!config.changelog.group_by_matchers);
        assert!(config.changelog.group_by_labels);
        assert_eq!(config.git.branch, "master");
        assert_eq!(config.git.remote, "origin");
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("prlog.yaml");
        std::fs::write(
            &config_path,
            "changelog:\n  include_pr_body: true\n  exclude_prs: [3, 4]\ngithub:\n  concurrency: 2\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert!(config.changelog.include_pr_body);
        assert_eq!(config.changelog.exclude_prs, vec![3, 4]);
        assert_eq!(config.github.concurrency, 2);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("prlog.toml"),
            "[changelog]\npr_title_matcher = [\"(unclosed\"]\n",
        )
        .unwrap();

        assert!(load_config_or_default(temp.path()).is_err());
    }
}
