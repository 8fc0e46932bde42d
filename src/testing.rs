//! In-memory sessions and fetchers for tests.

use crate::error::{FetchError, SessionError};
use crate::models::{JobTitle, Posting, SourceId, MISSING_LINK, UNKNOWN};
use crate::session::{PageSession, RenderedPage, SessionLauncher};
use crate::sources::SourceFetcher;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn posting(source: SourceId, title: &str, company: &str) -> Posting {
    Posting {
        title: title.to_string(),
        company: company.to_string(),
        location: "Remote".to_string(),
        link: format!("https://jobs.example.com/{}", title.replace(' ', "-")),
        posted: "1 day ago".to_string(),
        source,
    }
}

/// A posting with every field at its placeholder.
pub fn unknown_posting(source: SourceId) -> Posting {
    Posting {
        title: UNKNOWN.to_string(),
        company: UNKNOWN.to_string(),
        location: UNKNOWN.to_string(),
        link: MISSING_LINK.to_string(),
        posted: UNKNOWN.to_string(),
        source,
    }
}

/// Session that answers every render with the same page (or status).
pub struct StaticSession {
    url: String,
    html: String,
    fail_status: Option<u16>,
    requested: Mutex<Vec<String>>,
}

impl StaticSession {
    pub fn new(html: &str) -> Self {
        Self::with_url("https://www.linkedin.com/jobs/search", html)
    }

    pub fn with_url(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            html: html.to_string(),
            fail_status: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::new("")
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSession for StaticSession {
    async fn render(&self, url: &str) -> Result<RenderedPage, SessionError> {
        self.requested.lock().unwrap().push(url.to_string());
        if let Some(status) = self.fail_status {
            return Err(SessionError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(RenderedPage {
            url: self.url.clone(),
            html: self.html.clone(),
        })
    }

    async fn close(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Launcher that counts launches and closes of the sessions it hands out.
#[derive(Clone, Default)]
pub struct MockLauncher {
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

struct CountingSession {
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl PageSession for CountingSession {
    async fn render(&self, url: &str) -> Result<RenderedPage, SessionError> {
        Ok(RenderedPage {
            url: url.to_string(),
            html: String::new(),
        })
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SessionLauncher for MockLauncher {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession {
            closes: self.closes.clone(),
        }))
    }
}

/// Launcher that can never start a session.
pub struct FailingLauncher;

#[async_trait]
impl SessionLauncher for FailingLauncher {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError> {
        Err(SessionError::Launch("browser binary not found".to_string()))
    }
}

/// What a [`ScriptedFetcher`] does for one title.
#[derive(Clone)]
pub enum Script {
    Return(Vec<Posting>),
    Fail(u16),
    Delay(Duration, Vec<Posting>),
    Hang,
    Panic,
}

/// Fetcher with a fixed answer per title. Unscripted titles return nothing.
pub struct ScriptedFetcher {
    source: SourceId,
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, title: &str, script: Script) -> Self {
        self.scripts.insert(title.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    fn source(&self) -> SourceId {
        self.source
    }

    fn search_url(&self, title: &JobTitle) -> String {
        format!("https://{}.example.com/search?q={}", self.source.key(), title)
    }

    async fn fetch(
        &self,
        _session: &dyn PageSession,
        title: &JobTitle,
    ) -> Result<Vec<Posting>, FetchError> {
        self.calls.lock().unwrap().push(title.to_string());

        match self.scripts.get(title.as_str()).cloned() {
            None => Ok(vec![]),
            Some(Script::Return(postings)) => Ok(postings),
            Some(Script::Fail(status)) => Err(FetchError::new(
                self.source,
                title,
                SessionError::Status {
                    url: self.search_url(title),
                    status,
                },
            )),
            Some(Script::Delay(delay, postings)) => {
                tokio::time::sleep(delay).await;
                Ok(postings)
            }
            Some(Script::Hang) => {
                std::future::pending::<()>().await;
                Ok(vec![])
            }
            Some(Script::Panic) => panic!("fetcher exploded"),
        }
    }
}

/// Fetcher that panics as soon as it is asked which board it serves,
/// before any fetch starts.
pub struct BrokenFetcher;

#[async_trait]
impl SourceFetcher for BrokenFetcher {
    fn source(&self) -> SourceId {
        panic!("source registry corrupted")
    }

    fn search_url(&self, title: &JobTitle) -> String {
        format!("https://broken.example.com/search?q={}", title)
    }

    async fn fetch(
        &self,
        _session: &dyn PageSession,
        _title: &JobTitle,
    ) -> Result<Vec<Posting>, FetchError> {
        Ok(vec![])
    }
}
