//! Error types for the search pipeline.
//!
//! Domain failures are typed with thiserror so callers can tell a user
//! mistake from a broken source from an internal fault. Application
//! plumbing (config files, report output, server bind) uses anyhow.

use crate::models::{JobTitle, SourceId};
use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// Failures of the page-rendering session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session could not be started.
    #[error("failed to launch page session: {0}")]
    Launch(String),

    /// The page could not be loaded.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page did not finish loading in time.
    #[error("page load timed out: {url}")]
    Timeout { url: String },

    /// The site answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The session was used after being released.
    #[error("page session already closed")]
    Closed,
}

/// Why a single (source, title) fetch produced nothing.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("fetch exceeded {}s", .0.as_secs())]
    Timeout(Duration),

    /// The fetcher panicked, e.g. on markup the extractor did not expect.
    #[error("fetcher panicked: {0}")]
    Panicked(String),
}

/// One source failed for one title. Recovered inside the aggregator.
#[derive(Error, Debug)]
#[error("{site} search for '{title}' failed: {cause}")]
pub struct FetchError {
    pub site: SourceId,
    pub title: JobTitle,
    #[source]
    pub cause: FetchFailure,
}

impl FetchError {
    pub fn new(site: SourceId, title: &JobTitle, cause: impl Into<FetchFailure>) -> Self {
        Self {
            site,
            title: title.clone(),
            cause: cause.into(),
        }
    }
}

/// Errors surfaced to the caller of a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// No title, or a blank one. Nothing was fetched.
    #[error("Missing job title")]
    MissingTitle,

    /// No page session could be acquired.
    #[error("scraping session unavailable: {0}")]
    Session(#[source] SessionError),

    /// Every (title, source) fetch failed, so an empty result would be a lie.
    #[error("all {attempted} fetches failed")]
    AllFetchesFailed { attempted: usize },

    /// Unexpected fault inside the pipeline.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
