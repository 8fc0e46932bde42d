//! Job board fetchers.
//!
//! Each supported board implements [`SourceFetcher`]: it turns one title
//! into a search URL, renders that page through the request's
//! [`PageSession`], and reads the result cards into [`Posting`]s.

pub mod indeed;
pub mod linkedin;

pub use indeed::IndeedFetcher;
pub use linkedin::LinkedInFetcher;

use crate::error::FetchError;
use crate::models::{JobTitle, Posting, SourceId, MISSING_LINK, UNKNOWN};
use crate::session::{PageSession, RenderedPage};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Retrieves postings for one title from one job board.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Board this fetcher reads from.
    fn source(&self) -> SourceId;

    /// Search page URL for `title`.
    fn search_url(&self, title: &JobTitle) -> String;

    /// Render the search page for `title` and extract its postings.
    async fn fetch(
        &self,
        session: &dyn PageSession,
        title: &JobTitle,
    ) -> Result<Vec<Posting>, FetchError>;
}

/// CSS selectors for one board's result cards.
///
/// Field selectors are tried in order; the first non-blank match wins.
#[derive(Debug, Clone, Copy)]
pub struct SelectorSpec {
    pub card: &'static str,
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    /// Elements whose `href` is the posting link.
    pub link: &'static [&'static str],
    pub posted: &'static [&'static str],
}

/// Compiled form of a [`SelectorSpec`].
#[derive(Debug)]
pub struct CardExtractor {
    card: Selector,
    title: Vec<Selector>,
    company: Vec<Selector>,
    location: Vec<Selector>,
    link: Vec<Selector>,
    posted: Vec<Selector>,
}

fn compile(selectors: &[&str]) -> Result<Vec<Selector>> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).map_err(|e| anyhow!("invalid selector '{}': {}", s, e)))
        .collect()
}

impl CardExtractor {
    pub fn new(spec: &SelectorSpec) -> Result<Self> {
        Ok(Self {
            card: compile(&[spec.card])?.remove(0),
            title: compile(spec.title)?,
            company: compile(spec.company)?,
            location: compile(spec.location)?,
            link: compile(spec.link)?,
            posted: compile(spec.posted)?,
        })
    }

    /// Read every result card on `page` into a posting.
    pub fn extract(&self, page: &RenderedPage, source: SourceId) -> Vec<Posting> {
        let document = Html::parse_document(&page.html);
        let base = Url::parse(&page.url).ok();

        document
            .select(&self.card)
            .map(|card| Posting {
                title: first_text(card, &self.title),
                company: first_text(card, &self.company),
                location: first_text(card, &self.location),
                link: first_link(card, &self.link, base.as_ref()),
                posted: first_text(card, &self.posted),
                source,
            })
            .collect()
    }
}

/// Collapsed text of the first non-blank match, or [`UNKNOWN`].
fn first_text(card: ElementRef<'_>, selectors: &[Selector]) -> String {
    selectors
        .iter()
        .flat_map(|selector| card.select(selector))
        .map(|el| el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" "))
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Absolute `href` of the first matching link, or [`MISSING_LINK`].
fn first_link(card: ElementRef<'_>, selectors: &[Selector], base: Option<&Url>) -> String {
    selectors
        .iter()
        .flat_map(|selector| card.select(selector))
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .find_map(|href| match base {
            Some(base) => base.join(href).ok(),
            None => Url::parse(href).ok(),
        })
        .map(|url| url.to_string())
        .unwrap_or_else(|| MISSING_LINK.to_string())
}

/// Shared fetch path: render the search page, then extract.
pub(crate) async fn fetch_board(
    session: &dyn PageSession,
    extractor: &CardExtractor,
    source: SourceId,
    url: &str,
    title: &JobTitle,
) -> Result<Vec<Posting>, FetchError> {
    let page = session
        .render(url)
        .await
        .map_err(|e| FetchError::new(source, title, e))?;

    let postings = extractor.extract(&page, source);
    debug!("{} returned {} cards for '{}'", source, postings.len(), title);
    Ok(postings)
}

/// Build the fetchers for the enabled boards, in the configured order.
pub fn build_fetchers(config: &crate::config::SourcesConfig, location: &str) -> Result<Vec<Arc<dyn SourceFetcher>>> {
    let mut fetchers: Vec<Arc<dyn SourceFetcher>> = Vec::new();

    for source in config.enabled_sources()? {
        let fetcher: Arc<dyn SourceFetcher> = match source {
            SourceId::LinkedIn => Arc::new(LinkedInFetcher::new(&config.linkedin_url, location)?),
            SourceId::Indeed => Arc::new(IndeedFetcher::new(&config.indeed_url, location)?),
        };
        fetchers.push(fetcher);
    }

    if fetchers.is_empty() {
        return Err(anyhow!("no job sources enabled"));
    }

    Ok(fetchers)
}
