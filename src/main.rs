// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing) on stderr, so stdout stays clean for output
// 2. Parse command-line arguments using clap
// 3. Run the chosen crawler (concurrent `crawl` or sequential `walk`)
// 4. Print the sitemap as a tree or as JSON
// 5. Exit with proper code (0 = success, 2 = error)
//
// Logging is controlled with RUST_LOG, e.g. RUST_LOG=site_cartographer=debug
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, LimitArgs, OutputArgs};
use site_cartographer::{
    normalize_root, CrawlConfig, CrawlEngine, HttpFetcher, SequentialCrawler, Sitemap,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_cartographer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            workers,
            queue_capacity,
            timeout,
            limits,
            output,
        } => {
            let config = limits.to_config(workers, queue_capacity, timeout);
            handle_crawl(&url, config, &limits, &output).await
        }
        Commands::Walk { url, limits, output } => handle_walk(&url, &limits, &output).await,
    }
}

// Handles the 'crawl' subcommand
//
// Ctrl-C stops the engine early; whatever was mapped so far is still printed.
async fn handle_crawl(
    url: &str,
    config: CrawlConfig,
    limits: &LimitArgs,
    output: &OutputArgs,
) -> Result<i32> {
    let fetcher = HttpFetcher::new(limits.request_timeout()).context("creating HTTP client")?;
    let engine = CrawlEngine::new(Arc::new(fetcher), config)?;

    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted: stopping crawl");
            stop.stop();
        }
    });

    let sitemap = engine.run(url).await?;
    print_sitemap(&sitemap, url, output)?;
    Ok(0)
}

// Handles the 'walk' subcommand
async fn handle_walk(url: &str, limits: &LimitArgs, output: &OutputArgs) -> Result<i32> {
    let fetcher = HttpFetcher::new(limits.request_timeout()).context("creating HTTP client")?;
    let config = CrawlConfig {
        page_limit: limits.page_limit,
        links_per_page: limits.links_per_page,
        ..Default::default()
    };

    let sitemap = SequentialCrawler::new(Arc::new(fetcher), &config).crawl(url).await?;
    print_sitemap(&sitemap, url, output)?;
    Ok(0)
}

// Prints the sitemap either as a tree or JSON
fn print_sitemap(sitemap: &Sitemap, url: &str, output: &OutputArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if output.json {
        serde_json::to_writer_pretty(&mut out, sitemap)?;
        writeln!(out)?;
    } else {
        // The crawler already accepted this URL, so normalizing can't fail here
        let root = normalize_root(url)?;
        sitemap.write_tree(&mut out, &root, output.trim_root)?;
    }

    Ok(())
}
