//! Causelist - Delhi District Courts cause list downloader
//!
//! Main entry point for the CLI and the web form server.

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use causelist_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use causelist_scraper::{CauseListFetcher, CauseListRequest, CauseListRunner, probe};
use causelist_web::{WebConfig, WebServer};

use cli::{Cli, Commands};

/// Initialize tracing with console and daily rolling file output.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("causelist")
        .filename_suffix("log")
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Dropping the guard stops the writer thread.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

/// Load and validate the configuration. A missing file yields defaults.
fn load_config(path: &Path) -> Result<(Config, Vec<String>), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    let warnings = ConfigValidator::validate(&config)
        .into_result()?
        .into_iter()
        .map(|w| format!("{}: {}", w.path, w.message))
        .collect();
    Ok((config, warnings))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, warnings) = load_config(&cli.config)?;
    init_tracing(&config.logging)?;

    info!("Causelist v{}", env!("CARGO_PKG_VERSION"));
    if cli.config.exists() {
        info!("Loaded configuration from {}", cli.config.display());
    } else {
        info!("No configuration at {}, using defaults", cli.config.display());
    }
    for warning in &warnings {
        warn!("Config: {}", warning);
    }

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await,
        Some(Commands::Probe { hold_secs }) => run_probe(config, hold_secs).await,
        Some(Commands::Fetch { complex, date }) => run_fetch(config, complex, date).await,
    }
}

/// Serve the form until Ctrl-C.
async fn run_server(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let web_config = WebConfig::new(
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port),
    );
    info!("PDFs will be saved to {}", config.download.directory.display());

    let runner: Arc<dyn CauseListFetcher> = Arc::new(CauseListRunner::new(Arc::new(config)));
    let server = WebServer::new(web_config, runner);
    info!("Open http://{} in a browser", server.addr());

    server.run().await?;
    Ok(())
}

/// Enter the site's iframe and hold the browser open for inspection.
async fn run_probe(config: Config, hold_secs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let hold = Duration::from_secs(hold_secs.unwrap_or(config.probe.hold_secs));
    let report = probe(&config, hold).await?;
    println!(
        "Iframe {} ready, found '{}', held open for {}s",
        report.frame_url,
        report.element_selector,
        report.held.as_secs()
    );
    Ok(())
}

/// Run one download from the command line.
async fn run_fetch(
    config: Config,
    complex: String,
    date: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let date = date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let request = CauseListRequest::parse(&date, &complex)?;

    let runner = CauseListRunner::new(Arc::new(config));
    let outcome = runner.run(&request).await?;

    println!("{}", outcome.summary());
    for file in &outcome.files {
        println!("  {}", file.display());
    }
    Ok(())
}
