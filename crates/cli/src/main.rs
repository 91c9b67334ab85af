//! lesekorpus entry point.
//!
//! Crawls one site family and writes its records as a pretty JSON array.
//! Logging goes to stderr so stdout only carries the final summary line.

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use lesekorpus_client::{CrawlContext, Dataset, FetchClient, FetchConfig, crawl_site};
use lesekorpus_core::{AppConfig, Family};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lesekorpus", about = "Build sentence corpora from German children's reading sites")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Klexikon articles from the category listing
    Klexikon(CrawlArgs),
    /// MiniKlexikon articles from the category listing
    Miniklexikon(CrawlArgs),
    /// Projekt Gutenberg books from the reading tips
    Gutenberg(CrawlArgs),
    /// Wikijunior books from Wikibooks
    Wikijunior(CrawlArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
struct CrawlArgs {
    /// Limit category pages (wikis), books (Gutenberg) or book pages (Wikijunior)
    #[arg(short = 'n', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_pages: Option<usize>,

    /// Concurrent fetch workers (default from config: 2)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Output file (default: <site>_dataset.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Commands {
    fn family(&self) -> Family {
        match self {
            Commands::Klexikon(_) => Family::Klexikon,
            Commands::Miniklexikon(_) => Family::MiniKlexikon,
            Commands::Gutenberg(_) => Family::Gutenberg,
            Commands::Wikijunior(_) => Family::Wikijunior,
        }
    }

    fn args(&self) -> &CrawlArgs {
        match self {
            Commands::Klexikon(args)
            | Commands::Miniklexikon(args)
            | Commands::Gutenberg(args)
            | Commands::Wikijunior(args) => args,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset).with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let t0 = Instant::now();
    let args = cli.command.args().clone();
    let profile = cli.command.family().profile();

    let config = AppConfig::load()?.with_workers(args.workers)?;
    let session = Arc::new(FetchClient::new(FetchConfig::from(&config))?);

    let ctx = CrawlContext::new(session)
        .with_workers(config.workers)
        .with_max_pages(args.max_pages)
        .with_progress(!args.no_progress);

    let dataset = crawl_site(&profile, &ctx).await?;
    // last handle on the session
    drop(ctx);

    let output = args.output.unwrap_or_else(|| PathBuf::from(&profile.output_file));
    write_dataset(&output, &dataset)?;

    tracing::info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");
    println!("{} dataset with {} records saved to {}", profile.name, dataset.len(), output.display());
    Ok(())
}
