use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sprig_client::{HttpClient, ReqwestDownloader, ReqwestFetcher};
use sprig_core::{
    BatchRunner, ExtractionRules, FsStore, OutputLayout, ProfileExtractor,
    ProfileUrl, ScrapeService, TracingBatchReporter,
};

#[derive(Parser)]
#[command(name = "sprig", version, about = "Linktree profile scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one profile into <profileName>.json (and <identifier>.jpg)
    Scrape {
        /// Profile identifier, appended to the base URL
        identifier: String,

        #[command(flatten)]
        opts: CommonOpts,
    },

    /// Scrape several profiles with a bounded worker pool
    Batch {
        /// Profile identifiers
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Number of profiles scraped concurrently
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,

        #[command(flatten)]
        opts: CommonOpts,
    },
}

#[derive(Args)]
struct CommonOpts {
    /// Profile host the identifier is appended to
    #[arg(long, env = "SPRIG_BASE_URL", default_value = sprig_core::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory for the JSON and image files
    #[arg(short, long, env = "SPRIG_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, env = "SPRIG_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// JSON file overriding extraction selectors
    #[arg(long, env = "SPRIG_RULES")]
    rules: Option<PathBuf>,

    /// Allow requests to loopback/private addresses
    #[arg(long, default_value_t = false)]
    allow_private: bool,
}

type CliService = ScrapeService<ReqwestFetcher, FsStore, ReqwestDownloader>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sprig_core=info".parse()?)
                .add_directive("sprig_client=info".parse()?)
                .add_directive("sprig=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { identifier, opts } => {
            let service = build_service(&opts)?;
            cmd_scrape(&service, &identifier).await?;
        }
        Commands::Batch {
            identifiers,
            concurrency,
            opts,
        } => {
            let service = build_service(&opts)?;
            cmd_batch(service, identifiers, concurrency).await?;
        }
    }

    Ok(())
}

fn build_service(opts: &CommonOpts) -> Result<CliService> {
    let rules = match &opts.rules {
        Some(path) => ExtractionRules::from_file(path)?,
        None => ExtractionRules::default(),
    };
    let extractor = ProfileExtractor::new(&rules).context("Invalid extraction rules")?;
    let profile_url = ProfileUrl::new(&opts.base_url)?;

    let mut http = HttpClient::with_timeout(Duration::from_secs(opts.timeout))
        .context("Failed to create HTTP client")?;
    if opts.allow_private {
        http = http.allow_private_urls();
    }

    Ok(ScrapeService::new(
        ReqwestFetcher::new(http.clone()),
        FsStore,
        ReqwestDownloader::new(http),
        extractor,
    )
    .with_profile_url(profile_url)
    .with_layout(OutputLayout::new(&opts.output_dir)))
}

async fn cmd_scrape(service: &CliService, identifier: &str) -> Result<()> {
    // Image failures are logged by the service and do not change the exit status.
    service
        .scrape(identifier)
        .await
        .with_context(|| format!("Error during crawling {identifier}"))?;
    Ok(())
}

async fn cmd_batch(service: CliService, identifiers: Vec<String>, concurrency: usize) -> Result<()> {
    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, finishing in-flight profiles");
            ctrl_c_token.cancel();
        }
    });

    let total = identifiers.len();
    let runner = BatchRunner::new(service, concurrency);
    let report = runner
        .run(identifiers, cancel_token, Arc::new(TracingBatchReporter))
        .await;

    for entry in &report.entries {
        if let Err(e) = &entry.result {
            eprintln!("  [FAILED] {}: {}", entry.identifier, e);
        }
    }
    println!(
        "{} of {} profiles saved ({} failed, {} without image, {} skipped)",
        report.succeeded(),
        total,
        report.failed(),
        report.image_failures(),
        total - report.entries.len(),
    );

    if report.failed() > 0 {
        anyhow::bail!("{} profile(s) failed", report.failed());
    }
    Ok(())
}
