// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: map a site with the concurrent engine
// - walk:  map a site with the sequential baseline crawler
//
// Options shared by both live in `#[command(flatten)]` groups, so they're
// declared once and show up under both subcommands.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use site_cartographer::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "site-cartographer",
    version = "0.1.0",
    about = "Map every same-domain page reachable from a root URL",
    long_about = "site-cartographer crawls a website from a root URL, follows links that \
                  stay on the same domain, and prints the resulting sitemap as a tree or \
                  as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website with a pool of concurrent workers
    ///
    /// Example: site-cartographer crawl https://example.com --workers 20 --page-limit 200
    Crawl {
        /// Root URL to start from (e.g., https://example.com)
        url: String,

        /// Number of pages fetched in parallel
        #[arg(long, default_value_t = 10)]
        workers: usize,

        /// Maximum number of URLs handed to workers at once
        ///
        /// Anything beyond this waits in an unbounded backlog.
        #[arg(long, default_value_t = 500)]
        queue_capacity: usize,

        /// Seconds the queue must stay empty before the crawl is considered done
        #[arg(long, default_value_t = 5)]
        timeout: u64,

        #[command(flatten)]
        limits: LimitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Crawl a website one page at a time, breadth-first
    ///
    /// Example: site-cartographer walk https://example.com --page-limit 50
    Walk {
        /// Root URL to start from (e.g., https://example.com)
        url: String,

        #[command(flatten)]
        limits: LimitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Stop after this many pages (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub page_limit: usize,

    /// Follow at most this many new links per page (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub links_per_page: usize,

    /// Seconds before a single page request gives up
    #[arg(long, default_value_t = 10)]
    pub request_timeout: u64,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output the sitemap as JSON instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Strip the root URL from every line of the tree
    #[arg(long)]
    pub trim_root: bool,
}

impl LimitArgs {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    // Builds a config with these limits on top of the given concurrency settings
    pub fn to_config(
        &self,
        workers: usize,
        queue_capacity: usize,
        timeout_secs: u64,
    ) -> CrawlConfig {
        CrawlConfig {
            workers,
            queue_capacity,
            quiescence_timeout: Duration::from_secs(timeout_secs),
            page_limit: self.page_limit,
            links_per_page: self.links_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_crawl_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["site-cartographer", "crawl", "https://example.com"]);
        let Commands::Crawl {
            url,
            workers,
            queue_capacity,
            timeout,
            limits,
            output,
        } = cli.command
        else {
            panic!("expected crawl subcommand");
        };

        assert_eq!(url, "https://example.com");
        assert_eq!(limits.to_config(workers, queue_capacity, timeout), CrawlConfig::default());
        assert_eq!(limits.request_timeout(), Duration::from_secs(10));
        assert!(!output.json);
        assert!(!output.trim_root);
    }

    #[test]
    fn test_walk_flags() {
        let cli = Cli::parse_from([
            "site-cartographer",
            "walk",
            "https://example.com",
            "--page-limit",
            "50",
            "--links-per-page",
            "5",
            "--json",
        ]);
        let Commands::Walk { limits, output, .. } = cli.command else {
            panic!("expected walk subcommand");
        };

        assert_eq!(limits.page_limit, 50);
        assert_eq!(limits.links_per_page, 5);
        assert!(output.json);
    }
}
