//! Page-rendering sessions.
//!
//! A search acquires exactly one [`PageSession`] through a
//! [`SessionLauncher`], hands it to every fetcher, and releases it when
//! the search ends. [`SessionGuard`] makes the release happen on every
//! exit path, including cancellation of the request future.

pub mod http;

pub use http::{HttpLauncher, HttpSessionConfig};

use crate::error::SessionError;
use async_trait::async_trait;
use tracing::{debug, warn};

/// A page fully loaded by a session.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after redirects.
    pub url: String,
    /// Document markup once content is available.
    pub html: String,
}

/// A live rendering session.
///
/// Each `render` call works on its own page, so concurrent renders on one
/// session never share a page.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Load `url` and return its markup once the document content is ready.
    async fn render(&self, url: &str) -> Result<RenderedPage, SessionError>;

    /// Release the session. Renders after this fail with [`SessionError::Closed`].
    async fn close(&self) -> Result<(), SessionError>;
}

/// Starts sessions.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError>;
}

/// Owns a session for the duration of one search.
pub struct SessionGuard {
    session: Option<Box<dyn PageSession>>,
}

impl SessionGuard {
    /// Launch a session and wrap it.
    pub async fn acquire(launcher: &dyn SessionLauncher) -> Result<Self, SessionError> {
        let session = launcher.launch().await?;
        debug!("Page session acquired");
        Ok(Self {
            session: Some(session),
        })
    }

    pub fn session(&self) -> &dyn PageSession {
        match self.session.as_deref() {
            Some(session) => session,
            None => unreachable!("session is only taken by release()"),
        }
    }

    /// Close the session now. Close failures are logged, not returned.
    pub async fn release(mut self) {
        if let Some(session) = self.session.take() {
            match session.close().await {
                Ok(()) => debug!("Page session released"),
                Err(e) => warn!("Failed to close page session: {}", e),
            }
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        // Reached only when the owning future was dropped before release().
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Search cancelled, releasing page session in background");
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!("Failed to close page session: {}", e);
                    }
                });
            }
            Err(_) => warn!("No runtime available, page session dropped without close"),
        }
    }
}
