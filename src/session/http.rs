//! reqwest-backed page session.
//!
//! Pages are fetched over plain HTTP and considered ready once the whole
//! document body has been received. No JavaScript runs, so only markup
//! the sites render server-side is visible to the extractors.

use super::{PageSession, RenderedPage, SessionLauncher};
use crate::error::SessionError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Settings for HTTP page sessions.
#[derive(Debug, Clone)]
pub struct HttpSessionConfig {
    /// Ceiling for a single page load.
    pub page_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSessionConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(20),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&crate::config::SessionConfig> for HttpSessionConfig {
    fn from(config: &crate::config::SessionConfig) -> Self {
        Self {
            page_timeout: Duration::from_secs(config.page_timeout_seconds),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Launches one [`HttpPageSession`] per search.
pub struct HttpLauncher {
    config: HttpSessionConfig,
}

impl HttpLauncher {
    pub fn new(config: HttpSessionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .timeout(self.config.page_timeout)
            .user_agent(self.config.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        Ok(Box::new(HttpPageSession {
            client,
            closed: AtomicBool::new(false),
        }))
    }
}

/// A session over a shared HTTP client with its own cookie jar.
pub struct HttpPageSession {
    client: reqwest::Client,
    closed: AtomicBool,
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn render(&self, url: &str) -> Result<RenderedPage, SessionError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SessionError::Closed);
        }

        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SessionError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SessionError::Navigation {
                    url: url.to_string(),
                    reason: format!("failed to read body: {}", e),
                }
            }
        })?;

        Ok(RenderedPage {
            url: final_url,
            html,
        })
    }

    async fn close(&self) -> Result<(), SessionError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(SessionError::Closed);
        }
        Ok(())
    }
}
