//! Data models for the job search.
//!
//! This module contains the core data structures shared by the search
//! pipeline, the HTTP API and the report output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for any text field a source did not provide.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a posting link a source did not provide.
pub const MISSING_LINK: &str = "#";

/// A normalized (trimmed, lower-cased) job title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTitle(String);

impl JobTitle {
    /// Normalize a raw title. Returns `None` for empty or blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External job board a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    LinkedIn,
    Indeed,
}

impl SourceId {
    /// All supported sources, in default search order.
    pub const ALL: [SourceId; 2] = [SourceId::LinkedIn, SourceId::Indeed];

    /// Lower-case key used in config files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            SourceId::LinkedIn => "linkedin",
            SourceId::Indeed => "indeed",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::LinkedIn => write!(f, "LinkedIn"),
            SourceId::Indeed => write!(f, "Indeed"),
        }
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(SourceId::LinkedIn),
            "indeed" => Ok(SourceId::Indeed),
            other => Err(format!("unknown source '{}'", other)),
        }
    }
}

/// One discovered job listing.
///
/// Every field is always populated; sources that omit a value get
/// [`UNKNOWN`] (or [`MISSING_LINK`] for `link`) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Title as reported by the source (not necessarily the searched title).
    pub title: String,
    /// Employer name as reported by the source.
    pub company: String,
    pub location: String,
    /// Absolute URL of the listing, or [`MISSING_LINK`].
    pub link: String,
    /// Free-text posting date, format depends on the source.
    pub posted: String,
    pub source: SourceId,
}
