//! LinkedIn public job search.

use super::{fetch_board, CardExtractor, SelectorSpec, SourceFetcher};
use crate::error::FetchError;
use crate::models::{JobTitle, Posting, SourceId};
use crate::session::PageSession;
use anyhow::Result;
use async_trait::async_trait;

pub const DEFAULT_URL: &str = "https://www.linkedin.com/jobs/search";

const SELECTORS: SelectorSpec = SelectorSpec {
    card: ".base-card",
    title: &[".base-search-card__title"],
    company: &[".base-search-card__subtitle"],
    location: &[".job-search-card__location"],
    link: &[".base-card__full-link"],
    posted: &["time"],
};

pub struct LinkedInFetcher {
    base_url: String,
    location: String,
    extractor: CardExtractor,
}

impl LinkedInFetcher {
    pub fn new(base_url: &str, location: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('?').to_string(),
            location: location.to_string(),
            extractor: CardExtractor::new(&SELECTORS)?,
        })
    }
}

#[async_trait]
impl SourceFetcher for LinkedInFetcher {
    fn source(&self) -> SourceId {
        SourceId::LinkedIn
    }

    fn search_url(&self, title: &JobTitle) -> String {
        format!(
            "{}?keywords={}&location={}",
            self.base_url,
            urlencoding::encode(title.as_str()),
            urlencoding::encode(&self.location)
        )
    }

    async fn fetch(
        &self,
        session: &dyn PageSession,
        title: &JobTitle,
    ) -> Result<Vec<Posting>, FetchError> {
        let url = self.search_url(title);
        fetch_board(session, &self.extractor, SourceId::LinkedIn, &url, title).await
    }
}
