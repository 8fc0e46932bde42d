//! Search entry point.
//!
//! Validates the requested title, expands it, brackets the fetch matrix
//! with one page session and applies the company roster.

use super::aggregator::{aggregate, AggregateOptions};
use super::expander::TitleExpander;
use super::roster::CompanyRoster;
use crate::error::{panic_message, SearchError};
use crate::models::{JobTitle, Posting, SourceId};
use crate::session::{SessionGuard, SessionLauncher};
use crate::sources::SourceFetcher;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One request that a search would issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuery {
    pub title: JobTitle,
    pub source: SourceId,
    pub url: String,
}

pub struct SearchOrchestrator {
    expander: TitleExpander,
    /// `None` disables company filtering.
    roster: Option<CompanyRoster>,
    fetchers: Vec<Arc<dyn SourceFetcher>>,
    launcher: Arc<dyn SessionLauncher>,
    options: AggregateOptions,
}

impl SearchOrchestrator {
    pub fn new(
        expander: TitleExpander,
        roster: Option<CompanyRoster>,
        fetchers: Vec<Arc<dyn SourceFetcher>>,
        launcher: Arc<dyn SessionLauncher>,
        options: AggregateOptions,
    ) -> Self {
        Self {
            expander,
            roster,
            fetchers,
            launcher,
            options,
        }
    }

    /// Sources searched, in fetch order.
    pub fn sources(&self) -> Vec<SourceId> {
        self.fetchers.iter().map(|f| f.source()).collect()
    }

    fn expand(&self, raw_title: Option<&str>) -> Result<Vec<JobTitle>, SearchError> {
        let Some(title) = raw_title.and_then(JobTitle::parse) else {
            warn!("Missing job title");
            return Err(SearchError::MissingTitle);
        };

        info!("Searching jobs for: {}", title);
        let titles = self.expander.expand(&title);
        info!(
            "Searching for these job titles: {}",
            titles.iter().map(JobTitle::as_str).collect::<Vec<_>>().join(", ")
        );
        Ok(titles)
    }

    /// Every (title, source) query a search for `raw_title` would run.
    pub fn plan(&self, raw_title: Option<&str>) -> Result<Vec<PlannedQuery>, SearchError> {
        let titles = self.expand(raw_title)?;

        Ok(titles
            .iter()
            .flat_map(|title| {
                self.fetchers.iter().map(move |fetcher| PlannedQuery {
                    title: title.clone(),
                    source: fetcher.source(),
                    url: fetcher.search_url(title),
                })
            })
            .collect())
    }

    /// Search all sources for `raw_title` and its synonyms, keeping
    /// postings from roster companies.
    ///
    /// Individual fetch failures, panicking fetchers included, only shrink
    /// the result. The call fails when the title is missing, no session can
    /// be acquired, every fetch failed, or aggregation or filtering panics
    /// outside a fetch.
    pub async fn search(&self, raw_title: Option<&str>) -> Result<Vec<Posting>, SearchError> {
        let titles = self.expand(raw_title)?;

        let guard = SessionGuard::acquire(self.launcher.as_ref())
            .await
            .map_err(|e| {
                error!("Scraping error: {}", e);
                SearchError::Session(e)
            })?;

        let outcome = AssertUnwindSafe(self.gather(&titles, &guard))
            .catch_unwind()
            .await;

        guard.release().await;

        let postings = outcome.map_err(|panic| {
            let message = panic_message(panic.as_ref());
            error!("Search pipeline panicked: {}", message);
            SearchError::Internal(message)
        })??;

        info!("Total matching jobs found: {}", postings.len());
        Ok(postings)
    }

    /// Aggregate over the session, reject total failure, then filter.
    async fn gather(
        &self,
        titles: &[JobTitle],
        guard: &SessionGuard,
    ) -> Result<Vec<Posting>, SearchError> {
        let aggregation = aggregate(titles, &self.fetchers, guard.session(), &self.options).await;

        let attempted = titles.len() * self.fetchers.len();
        if attempted > 0 && aggregation.failures.len() == attempted {
            error!("All {} fetches failed", attempted);
            return Err(SearchError::AllFetchesFailed { attempted });
        }

        Ok(match &self.roster {
            Some(roster) => roster.filter(aggregation.postings),
            None => aggregation.postings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::expander::SynonymTable;
    use crate::testing::{
        posting, BrokenFetcher, FailingLauncher, MockLauncher, Script, ScriptedFetcher,
    };
    use std::time::Duration;

    fn options() -> AggregateOptions {
        AggregateOptions {
            concurrency: 1,
            fetch_timeout: Duration::from_secs(5),
        }
    }

    fn orchestrator(
        fetchers: Vec<Arc<dyn SourceFetcher>>,
        launcher: Arc<dyn SessionLauncher>,
    ) -> SearchOrchestrator {
        SearchOrchestrator::new(
            TitleExpander::default(),
            Some(CompanyRoster::default()),
            fetchers,
            launcher,
            options(),
        )
    }

    #[tokio::test]
    async fn test_software_engineer_keeps_apple() {
        let linkedin = Arc::new(
            ScriptedFetcher::new(SourceId::LinkedIn)
                .on(
                    "software engineer",
                    Script::Return(vec![
                        posting(SourceId::LinkedIn, "iOS Engineer", "Apple Inc."),
                        posting(SourceId::LinkedIn, "Engineer", "Small Shop"),
                    ]),
                )
                .on(
                    "backend engineer",
                    Script::Return(vec![posting(SourceId::LinkedIn, "Backend", "Google LLC")]),
                ),
        );
        let indeed = Arc::new(ScriptedFetcher::new(SourceId::Indeed).on(
            "developer",
            Script::Return(vec![
                posting(SourceId::Indeed, "Developer", "Microsoft Corporation"),
                posting(SourceId::Indeed, "Developer", "Local Bakery"),
            ]),
        ));
        let launcher = MockLauncher::new();
        let search = orchestrator(
            vec![linkedin.clone(), indeed.clone()],
            Arc::new(launcher.clone()),
        );

        let jobs = search.search(Some("Software Engineer")).await.unwrap();

        let companies: Vec<&str> = jobs.iter().map(|p| p.company.as_str()).collect();
        assert_eq!(companies, vec!["Apple Inc.", "Microsoft Corporation", "Google LLC"]);
        assert_eq!(linkedin.calls().len(), 7);
        assert_eq!(indeed.calls().len(), 7);
        assert_eq!(launcher.launches(), 1);
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_missing_title_fetches_nothing() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn));
        let launcher = MockLauncher::new();
        let search = orchestrator(vec![linkedin.clone()], Arc::new(launcher.clone()));

        assert!(matches!(search.search(None).await, Err(SearchError::MissingTitle)));
        assert!(matches!(search.search(Some("   ")).await, Err(SearchError::MissingTitle)));
        assert!(linkedin.calls().is_empty());
        assert_eq!(launcher.launches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_and_no_roster_match_is_empty_success() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn).on("barista", Script::Hang));
        let indeed = Arc::new(ScriptedFetcher::new(SourceId::Indeed).on(
            "barista",
            Script::Return(vec![
                posting(SourceId::Indeed, "Barista", "Corner Cafe"),
                posting(SourceId::Indeed, "Barista", "Bean There"),
                posting(SourceId::Indeed, "Head Barista", "Daily Grind"),
            ]),
        ));
        let launcher = MockLauncher::new();
        let search = orchestrator(vec![linkedin.clone(), indeed], Arc::new(launcher.clone()));

        let jobs = search.search(Some("Barista")).await.unwrap();

        assert!(jobs.is_empty());
        assert_eq!(linkedin.calls(), vec!["barista".to_string()]);
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_across_titles_are_kept() {
        let same_job = posting(SourceId::LinkedIn, "Programmer", "IBM");
        let linkedin = Arc::new(
            ScriptedFetcher::new(SourceId::LinkedIn)
                .on("developer", Script::Return(vec![same_job.clone()]))
                .on("programmer", Script::Return(vec![same_job.clone()])),
        );
        let search = orchestrator(vec![linkedin], Arc::new(MockLauncher::new()));

        let jobs = search.search(Some("software engineer")).await.unwrap();

        assert_eq!(jobs, vec![same_job.clone(), same_job]);
    }

    #[tokio::test]
    async fn test_session_failure_is_reported() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn));
        let search = orchestrator(vec![linkedin.clone()], Arc::new(FailingLauncher));

        let result = search.search(Some("developer")).await;

        assert!(matches!(result, Err(SearchError::Session(_))));
        assert!(linkedin.calls().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_fetch_keeps_other_postings() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn).on(
            "software engineer",
            Script::Return(vec![posting(SourceId::LinkedIn, "iOS Engineer", "Apple Inc.")]),
        ));
        let indeed = Arc::new(ScriptedFetcher::new(SourceId::Indeed).on("programmer", Script::Panic));
        let launcher = MockLauncher::new();
        let search = orchestrator(vec![linkedin, indeed.clone()], Arc::new(launcher.clone()));

        let jobs = search.search(Some("software engineer")).await.unwrap();

        let companies: Vec<&str> = jobs.iter().map(|p| p.company.as_str()).collect();
        assert_eq!(companies, vec!["Apple Inc."]);
        assert_eq!(indeed.calls().len(), 7);
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_every_fetch_panicking_is_all_failed() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn).on("developer", Script::Panic));
        let launcher = MockLauncher::new();
        let search = orchestrator(vec![linkedin], Arc::new(launcher.clone()));

        let result = search.search(Some("developer")).await;

        assert!(matches!(result, Err(SearchError::AllFetchesFailed { attempted: 1 })));
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_fault_outside_fetch_is_internal_and_releases_session() {
        let launcher = MockLauncher::new();
        let search = orchestrator(vec![Arc::new(BrokenFetcher)], Arc::new(launcher.clone()));

        let result = search.search(Some("developer")).await;

        match result {
            Err(SearchError::Internal(message)) => assert_eq!(message, "source registry corrupted"),
            other => panic!("expected internal error, got {:?}", other),
        }
        assert_eq!(launcher.launches(), 1);
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_all_fetches_failing_is_an_error() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn).on("developer", Script::Fail(503)));
        let indeed = Arc::new(ScriptedFetcher::new(SourceId::Indeed).on("developer", Script::Fail(403)));
        let launcher = MockLauncher::new();
        let search = orchestrator(vec![linkedin, indeed], Arc::new(launcher.clone()));

        let result = search.search(Some("developer")).await;

        assert!(matches!(result, Err(SearchError::AllFetchesFailed { attempted: 2 })));
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_disabled_filter_returns_everything() {
        let linkedin = Arc::new(ScriptedFetcher::new(SourceId::LinkedIn).on(
            "barista",
            Script::Return(vec![posting(SourceId::LinkedIn, "Barista", "Corner Cafe")]),
        ));
        let search = SearchOrchestrator::new(
            TitleExpander::default(),
            None,
            vec![linkedin],
            Arc::new(MockLauncher::new()),
            options(),
        );

        let jobs = search.search(Some("barista")).await.unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_plan_lists_every_query() {
        let table = SynonymTable::new(vec![("nurse", vec!["rn"])]);
        let search = SearchOrchestrator::new(
            TitleExpander::new(table),
            Some(CompanyRoster::default()),
            vec![
                Arc::new(ScriptedFetcher::new(SourceId::LinkedIn)),
                Arc::new(ScriptedFetcher::new(SourceId::Indeed)),
            ],
            Arc::new(MockLauncher::new()),
            options(),
        );

        let plan = search.plan(Some("Nurse")).unwrap();

        let pairs: Vec<(&str, SourceId)> = plan.iter().map(|q| (q.title.as_str(), q.source)).collect();
        assert_eq!(
            pairs,
            vec![
                ("nurse", SourceId::LinkedIn),
                ("nurse", SourceId::Indeed),
                ("rn", SourceId::LinkedIn),
                ("rn", SourceId::Indeed),
            ]
        );
        assert_eq!(plan[0].url, "https://linkedin.example.com/search?q=nurse");
        assert!(search.plan(None).is_err());
    }
}
