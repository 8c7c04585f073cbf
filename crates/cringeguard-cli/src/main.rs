//! Cringe Guard
//!
//! Scans LinkedIn feed dumps for cringe posts with an LLM classifier and
//! manages the persisted settings and usage stats.

use anyhow::Result;
use clap::Parser;
use cringeguard_classifiers::CringeClassifier;
use cringeguard_feed::prelude::*;
use cringeguard_feed::{settings, Startup};
use futures::Stream;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod cli;
mod config;

use cli::{Cli, Commands};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = AppConfig::load(&cli)?;
    info!(storage = %config.storage_path.display(), "configuration loaded");

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.storage_path));

    match &cli.command {
        Commands::Scan { file, follow } => {
            scan(&config, store, cli.api_key.as_deref(), file, *follow).await?;
        }
        Commands::Stats => {
            let settings = Settings::load(store.as_ref()).await?;
            print_stats(&settings);
        }
        Commands::Enable => {
            settings::set_enabled(store.as_ref(), true).await?;
            println!("Cringe Guard is on");
        }
        Commands::Disable => {
            settings::set_enabled(store.as_ref(), false).await?;
            println!("Cringe Guard is off");
        }
        Commands::SetKey { key } => {
            if settings::save_api_key(store.as_ref(), key).await? {
                println!("API key saved");
            } else {
                println!("Please enter an API key");
            }
        }
        Commands::ClearKey => {
            settings::clear_api_key(store.as_ref()).await?;
            println!("API key deleted");
        }
        Commands::Criteria => {
            for criterion in &config.classifier.criteria {
                println!("- {criterion}");
            }
        }
    }

    Ok(())
}

async fn scan(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
    api_key_override: Option<&str>,
    file: &Path,
    follow: bool,
) -> Result<()> {
    let mut stored = Settings::load(store.as_ref()).await?;
    if let Some(key) = api_key_override.map(str::trim).filter(|k| !k.is_empty()) {
        stored.api_key = Some(key.to_string());
    }

    let api_key = match Startup::check(&stored) {
        Startup::Ready { api_key } => api_key,
        Startup::Disabled => {
            println!("Cringe Guard is off; run `cringeguard enable` to scan");
            return Ok(());
        }
        Startup::MissingApiKey => {
            println!("No API key set; run `cringeguard set-key <KEY>` or set GROQ_API_KEY");
            return Ok(());
        }
    };

    let classifier = Arc::new(CringeClassifier::new(config.classifier.clone())?.with_api_key(api_key));
    let presenter = Arc::new(OverlayPresenter::new(config.feed.blur.clone()));
    let stats = Arc::new(StatsTracker::new(store));
    let observer = FeedObserver::new(&config.feed, classifier, presenter.clone(), stats.clone())?;

    let document = tokio::fs::read_to_string(file).await?;
    let mut report = observer.process_existing(&document).await;

    if follow {
        info!("watching stdin for inserted posts");
        report.merge(&observer.observe(stdin_nodes()).await);
    }

    for overlay in presenter.overlays() {
        println!("[hidden] {}", overlay.post_key);
        println!("{}", overlay.tooltip());
    }
    println!(
        "Scanned {} posts: {} hidden, {} clean, {} skipped, {} failed",
        report.discovered, report.flagged, report.clean, report.skipped, report.failed
    );

    let settings = Settings {
        stats: stats.load().await?,
        ..stored
    };
    print_stats(&settings);
    Ok(())
}

/// One inserted node per stdin line, ending at EOF
fn stdin_nodes() -> impl Stream<Item = InsertedNode> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    futures::stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((InsertedNode::from(line), lines)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                None
            }
        }
    })
}

const MISSING_KEY_HINT: &str = "API key not set; run `cringeguard set-key <KEY>`";

fn print_stats(settings: &Settings) {
    for line in stats_lines(settings) {
        println!("{line}");
    }
}

/// Popup view: counters, plus a warning while no API key is stored
fn stats_lines(settings: &Settings) -> Vec<String> {
    let mut lines = vec![
        format!("Posts hidden: {}", settings.stats.cringe_count),
        format!("Time saved:   {}", settings.stats.time_saved_label()),
    ];
    if !settings.has_api_key() {
        lines.push(MISSING_KEY_HINT.to_string());
    }
    lines
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("cringeguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cringeguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
