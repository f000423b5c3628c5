//! Changelog formatters

mod json;
mod markdown;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;

use crate::types::ChangelogEntry;

/// Rendering switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// strftime format for the release date
    pub date_format: String,
    /// Render pull request descriptions
    pub include_body: bool,
}

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Format a changelog entry to string
    fn format(&self, entry: &ChangelogEntry, options: &RenderOptions) -> String;
}
