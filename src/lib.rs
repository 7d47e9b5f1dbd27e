// src/lib.rs
// =============================================================================
// site-cartographer: map the same-domain pages reachable from a root URL.
//
// Modules:
// - config:  CrawlConfig, the settings handed to a crawler
// - crawl:   the concurrent CrawlEngine and the SequentialCrawler baseline
// - fetch:   the Fetcher trait and its HTTP implementation
// - sitemap: the result, a URL -> children map with a tree printer
// - error:   setup errors and root URL validation
//
// Example:
//   let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(10))?);
//   let engine = CrawlEngine::new(fetcher, CrawlConfig::default())?;
//   let sitemap = engine.run("https://example.com").await?;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod sitemap;

pub use config::{ConfigError, CrawlConfig};
pub use crawl::{CrawlEngine, SequentialCrawler, StopHandle};
pub use error::{normalize_root, CrawlError};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use sitemap::Sitemap;
