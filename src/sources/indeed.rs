//! Indeed job search.

use super::{fetch_board, CardExtractor, SelectorSpec, SourceFetcher};
use crate::error::FetchError;
use crate::models::{JobTitle, Posting, SourceId};
use crate::session::PageSession;
use anyhow::Result;
use async_trait::async_trait;

pub const DEFAULT_URL: &str = "https://www.indeed.com/jobs";

// Indeed puts the full title in a span's title attribute and sometimes
// prefixes the h2 text with a "new" badge, so the span is tried first.
const SELECTORS: SelectorSpec = SelectorSpec {
    card: ".job_seen_beacon",
    title: &["h2.jobTitle span[title]", "h2.jobTitle"],
    company: &["[data-testid=\"company-name\"]", ".companyName"],
    location: &["[data-testid=\"text-location\"]", ".companyLocation"],
    link: &["h2.jobTitle a"],
    posted: &[".date", "[data-testid=\"myJobsStateDate\"]"],
};

pub struct IndeedFetcher {
    base_url: String,
    location: String,
    extractor: CardExtractor,
}

impl IndeedFetcher {
    pub fn new(base_url: &str, location: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('?').to_string(),
            location: location.to_string(),
            extractor: CardExtractor::new(&SELECTORS)?,
        })
    }
}

#[async_trait]
impl SourceFetcher for IndeedFetcher {
    fn source(&self) -> SourceId {
        SourceId::Indeed
    }

    fn search_url(&self, title: &JobTitle) -> String {
        format!(
            "{}?q={}&l={}",
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
        fetch_board(session, &self.extractor, SourceId::Indeed, &url, title).await
    }
}
