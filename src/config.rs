//! `.jobscout.toml` settings.
//!
//! Every section is optional; missing keys take their built-in defaults
//! and explicit CLI flags win over the file.

use crate::models::SourceId;
use crate::search::{CompanyRoster, SynonymTable, TitleExpander};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".jobscout.toml";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Search pipeline settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Page session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Job board settings.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Overrides for the built-in synonym table and company roster.
    #[serde(default)]
    pub tables: TablesConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// Search pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fetches in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Ceiling for a single (title, source) fetch.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    /// Location passed to every job board.
    #[serde(default = "default_location")]
    pub location: String,

    /// Keep only postings from roster companies.
    #[serde(default = "default_true")]
    pub apply_company_filter: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            fetch_timeout_seconds: default_fetch_timeout(),
            location: default_location(),
            apply_company_filter: true,
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_location() -> String {
    "United States".to_string()
}

fn default_true() -> bool {
    true
}

/// Page session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Ceiling for a single page load.
    #[serde(default = "default_page_timeout")]
    pub page_timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_timeout_seconds: default_page_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_page_timeout() -> u64 {
    20
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Job board settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Boards to search, in fetch order.
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,

    #[serde(default = "default_linkedin_url")]
    pub linkedin_url: String,

    #[serde(default = "default_indeed_url")]
    pub indeed_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            linkedin_url: default_linkedin_url(),
            indeed_url: default_indeed_url(),
        }
    }
}

fn default_enabled() -> Vec<String> {
    SourceId::ALL.iter().map(|s| s.key().to_string()).collect()
}

fn default_linkedin_url() -> String {
    crate::sources::linkedin::DEFAULT_URL.to_string()
}

fn default_indeed_url() -> String {
    crate::sources::indeed::DEFAULT_URL.to_string()
}

impl SourcesConfig {
    /// Parse the enabled list. Unknown names are an error.
    pub fn enabled_sources(&self) -> Result<Vec<SourceId>> {
        let mut sources = Vec::new();
        for name in &self.enabled {
            let source: SourceId = name.parse().map_err(anyhow::Error::msg)?;
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        Ok(sources)
    }
}

/// Table overrides. Absent tables fall back to the built-in ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<String>>,
}

impl TablesConfig {
    pub fn expander(&self) -> TitleExpander {
        match &self.synonyms {
            Some(synonyms) => TitleExpander::new(SynonymTable::new(synonyms.clone())),
            None => TitleExpander::default(),
        }
    }

    pub fn roster(&self) -> CompanyRoster {
        match &self.companies {
            Some(companies) => CompanyRoster::new(companies),
            None => CompanyRoster::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }
        if let Some(concurrency) = args.concurrency {
            self.search.concurrency = concurrency;
        }
        if let Some(timeout) = args.timeout {
            self.search.fetch_timeout_seconds = timeout;
        }
        if let Some(ref sources) = args.sources {
            self.sources.enabled = sources.iter().map(|s| s.key().to_string()).collect();
        }
        if args.all_companies {
            self.search.apply_company_filter = false;
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.search.concurrency == 0 {
            bail!("search.concurrency must be at least 1");
        }
        if self.search.fetch_timeout_seconds == 0 {
            bail!("search.fetch_timeout_seconds must be at least 1");
        }
        if self.session.page_timeout_seconds == 0 {
            bail!("session.page_timeout_seconds must be at least 1");
        }
        if self.sources.enabled_sources()?.is_empty() {
            bail!("sources.enabled must name at least one job board");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
