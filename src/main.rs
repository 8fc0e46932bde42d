//! JobScout - job board search for large employers
//!
//! Expands a job title through a synonym table, searches every enabled
//! job board for each variant, and keeps postings from a roster of large
//! companies. Runs either as a one-shot CLI search or as an HTTP API.
//!
//! Exit codes:
//!   0 - Success (including searches that found nothing)
//!   1 - Runtime error (config, scraping session, every fetch failed, etc.)
//!   2 - Missing or blank job title

mod cli;
mod config;
mod error;
mod models;
mod report;
mod search;
mod server;
mod session;
mod sources;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use error::SearchError;
use indicatif::{ProgressBar, ProgressStyle};
use report::{ReportMetadata, SearchReport};
use search::{AggregateOptions, SearchOrchestrator};
use session::{HttpLauncher, HttpSessionConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("JobScout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Search failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .jobscout.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", config::CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to change sources, timeouts, synonyms and the company roster.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load config, build the pipeline, then serve or search. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let search = build_orchestrator(&config)?;

    if args.serve {
        let state = server::AppState {
            search: Arc::new(search),
        };
        server::run(&config.server.bind, state).await?;
        return Ok(0);
    }

    if args.dry_run {
        return handle_dry_run(&search, args.title.as_deref());
    }

    run_search(&args, &config, &search).await
}

/// Wire the configured tables, sources and session launcher together.
fn build_orchestrator(config: &Config) -> Result<SearchOrchestrator> {
    let fetchers = sources::build_fetchers(&config.sources, &config.search.location)?;
    let launcher = Arc::new(HttpLauncher::new(HttpSessionConfig::from(&config.session)));

    let expander = config.tables.expander();
    let roster = config
        .search
        .apply_company_filter
        .then(|| config.tables.roster());

    match &roster {
        Some(roster) => info!(
            "Loaded {} synonym entries and {} roster companies",
            expander.table().len(),
            roster.names().len()
        ),
        None => warn!("Company filter disabled, all postings will be returned"),
    }

    Ok(SearchOrchestrator::new(
        expander,
        roster,
        fetchers,
        launcher,
        AggregateOptions::from(&config.search),
    ))
}

/// Handle --dry-run: print the queries, no network I/O.
fn handle_dry_run(search: &SearchOrchestrator, title: Option<&str>) -> Result<i32> {
    let plan = match search.plan(title) {
        Ok(plan) => plan,
        Err(SearchError::MissingTitle) => {
            eprintln!("Error: Missing job title");
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    println!("\n🔍 Dry run: {} queries would be made\n", plan.len());
    for query in &plan {
        println!("   [{}] {}", query.source, query.title);
        println!("      {}", query.url);
    }
    println!("\n✅ Dry run complete. No pages were fetched.");
    Ok(0)
}

/// Run one search and print or save the results.
async fn run_search(args: &Args, config: &Config, search: &SearchOrchestrator) -> Result<i32> {
    let start_time = Instant::now();
    let title = args.title.clone().unwrap_or_default();

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Searching job boards for \"{}\"...", title.trim()));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let result = search.search(Some(title.as_str())).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let postings = match result {
        Ok(postings) => postings,
        Err(SearchError::MissingTitle) => {
            eprintln!("Error: Missing job title");
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    let report = SearchReport {
        metadata: ReportMetadata {
            title: title.trim().to_string(),
            searched_at: Utc::now(),
            sources: search.sources(),
            company_filter: config.search.apply_company_filter,
            total_postings: postings.len(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        postings,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Text => report::generate_text_report(&report),
    };

    match &args.output {
        Some(path) => {
            report::write_report(&output, path)?;
            println!(
                "✅ {} jobs saved to: {}",
                report.metadata.total_postings,
                path.display()
            );
        }
        None => print!("{}", output),
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
