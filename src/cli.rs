//! Command-line arguments.
//!
//! One binary, two modes: a one-shot `--title` search or the `--serve`
//! HTTP API. Flags given here override `.jobscout.toml`.

use crate::models::SourceId;
use clap::Parser;
use std::path::PathBuf;

/// JobScout - job board search for large employers
///
/// Searches LinkedIn and Indeed for a job title and its common synonyms,
/// then keeps the postings from a roster of large companies.
///
/// Examples:
///   jobscout --title "software engineer"
///   jobscout --title "data scientist" --sources linkedin --format json
///   jobscout --title "nurse" --dry-run
///   jobscout --serve --bind 0.0.0.0:3000
///   jobscout --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Job title to search for
    ///
    /// Matched case-insensitively against the synonym table.
    #[arg(short, long, value_name = "TITLE", required_unless_present_any = ["serve", "init_config"])]
    pub title: Option<String>,

    /// Run the HTTP API instead of a one-shot search
    #[arg(long, conflicts_with_all = ["title", "dry_run"])]
    pub serve: bool,

    /// Address for the HTTP API (with --serve)
    #[arg(long, value_name = "ADDR", env = "JOBSCOUT_BIND")]
    pub bind: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .jobscout.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "JOBSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Job boards to search (comma-separated)
    ///
    /// Example: --sources linkedin,indeed
    #[arg(long, value_name = "SOURCES", value_delimiter = ',')]
    pub sources: Option<Vec<SourceId>>,

    /// Number of concurrent page fetches
    #[arg(long, value_name = "NUM")]
    pub concurrency: Option<usize>,

    /// Per-fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep postings from every company, not just the roster
    #[arg(long)]
    pub all_companies: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: print the queries a search would make, without fetching
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .jobscout.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for one-shot results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text table (default)
    #[default]
    Text,
    /// JSON report
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// A blank title is not rejected here; the search itself reports it.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err("Concurrency must be at least 1".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref sources) = self.sources {
            if sources.is_empty() {
                return Err("At least one source is required".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.serve && self.output.is_some() {
            return Err("--output has no effect with --serve".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
