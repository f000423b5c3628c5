//! prlog Changelog - changelog generation from merged pull requests
//!
//! The pipeline is pure and synchronous: every pull request is classified
//! against the valid-label table and the title matchers, the classified list
//! is partitioned into ordered groups, and the groups are rendered.

pub mod classifier;
pub mod clock;
pub mod formatter;
pub mod generator;
pub mod grouping;
pub mod options;
pub mod types;

pub use classifier::classify;
pub use clock::{Clock, FixedClock, SystemClock};
pub use formatter::{ChangelogFormatter, JsonFormatter, MarkdownFormatter, RenderOptions};
pub use generator::ChangelogGenerator;
pub use grouping::{group, GroupingOptions};
pub use options::{ChangelogOptions, TitleMatcher, ValidLabel, ValidLabels};
pub use types::{ChangelogEntry, ClassifiedPullRequest, Group};
