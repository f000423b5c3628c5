//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::Parser;

use commands::ChangelogCommand;

/// prlog - generate a changelog from merged GitHub pull requests
#[derive(Debug, Parser)]
#[command(name = "prlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print full error chains and debug logs
    #[arg(long, global = true)]
    pub trace: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(flatten)]
    pub changelog: ChangelogCommand,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown changelog
    #[default]
    Text,
    /// Grouped pull requests as JSON
    Json,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        self.changelog.execute(self)
    }
}
