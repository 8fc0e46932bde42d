//! Fan-out of fetchers over expanded titles.
//!
//! Every (title, fetcher) pair is fetched once. Failures stay local to
//! their pair, panics included: they are logged, recorded, and
//! contribute no postings.

use crate::error::{panic_message, FetchError, FetchFailure};
use crate::models::{JobTitle, Posting};
use crate::session::PageSession;
use crate::sources::SourceFetcher;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Limits applied to one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Fetches in flight at once. 1 runs the matrix sequentially.
    pub concurrency: usize,
    /// Ceiling for a single fetch, on top of the session's page timeout.
    pub fetch_timeout: Duration,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&crate::config::SearchConfig> for AggregateOptions {
    fn from(config: &crate::config::SearchConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_seconds),
        }
    }
}

/// Result of one aggregation run.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Postings from all successful fetches, titles outer, fetchers inner.
    pub postings: Vec<Posting>,
    /// One entry per failed (title, fetcher) pair.
    pub failures: Vec<FetchError>,
}

/// Run every fetcher for every title and concatenate the results.
///
/// Output order is title-major, fetcher-minor regardless of concurrency.
/// Postings are neither re-ordered nor deduplicated.
pub async fn aggregate(
    titles: &[JobTitle],
    fetchers: &[Arc<dyn SourceFetcher>],
    session: &dyn PageSession,
    options: &AggregateOptions,
) -> Aggregation {
    let fetches: Vec<_> = titles
        .iter()
        .flat_map(|title| fetchers.iter().map(move |fetcher| (title, fetcher)))
        .map(|(title, fetcher)| fetch_one(title, fetcher.as_ref(), session, options.fetch_timeout))
        .collect();

    let results: Vec<Result<Vec<Posting>, FetchError>> = stream::iter(fetches)
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut aggregation = Aggregation::default();
    for result in results {
        match result {
            Ok(postings) => aggregation.postings.extend(postings),
            Err(e) => {
                warn!("{}", e);
                aggregation.failures.push(e);
            }
        }
    }

    info!(
        "Collected {} postings from {} fetches ({} failed)",
        aggregation.postings.len(),
        titles.len() * fetchers.len(),
        aggregation.failures.len()
    );

    aggregation
}

async fn fetch_one(
    title: &JobTitle,
    fetcher: &dyn SourceFetcher,
    session: &dyn PageSession,
    timeout: Duration,
) -> Result<Vec<Posting>, FetchError> {
    let source = fetcher.source();
    let fetch = AssertUnwindSafe(fetcher.fetch(session, title)).catch_unwind();

    match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(Ok(postings))) => {
            debug!("Found {} {} jobs for '{}'", postings.len(), source, title);
            Ok(postings)
        }
        Ok(Ok(Err(e))) => Err(e),
        Ok(Err(panic)) => Err(FetchError::new(
            source,
            title,
            FetchFailure::Panicked(panic_message(panic.as_ref())),
        )),
        Err(_) => Err(FetchError::new(source, title, FetchFailure::Timeout(timeout))),
    }
}
