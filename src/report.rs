//! Output for one-shot searches.
//!
//! Results are printed as a plain text listing or as a JSON report with
//! a small metadata header.

use crate::models::{Posting, SourceId};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Metadata about a search run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Title as requested by the user.
    pub title: String,
    pub searched_at: DateTime<Utc>,
    pub sources: Vec<SourceId>,
    pub company_filter: bool,
    pub total_postings: usize,
    pub duration_seconds: f64,
}

/// A search run and its postings.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub metadata: ReportMetadata,
    pub postings: Vec<Posting>,
}

/// Generate a plain text listing.
pub fn generate_text_report(report: &SearchReport) -> String {
    let mut output = String::new();
    let meta = &report.metadata;

    output.push_str(&format!(
        "Jobs for \"{}\" ({} found, {:.1}s)\n",
        meta.title, meta.total_postings, meta.duration_seconds
    ));
    output.push_str(&format!(
        "Sources: {}\n",
        meta.sources
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    if !meta.company_filter {
        output.push_str("Company filter: off\n");
    }
    output.push('\n');

    if report.postings.is_empty() {
        output.push_str("No matching jobs found.\n");
        return output;
    }

    for (i, posting) in report.postings.iter().enumerate() {
        output.push_str(&format!("{:>3}. {}\n", i + 1, posting.title));
        output.push_str(&format!(
            "     {} | {} | {} | {}\n",
            posting.company, posting.location, posting.posted, posting.source
        ));
        output.push_str(&format!("     {}\n", posting.link));
    }

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SearchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Write rendered output to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write results to {}", path.display()))
}
