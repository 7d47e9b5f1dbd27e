// src/crawl/mod.rs
// =============================================================================
// This module maps a website by crawling it.
//
// Two crawlers live here:
// - CrawlEngine: the concurrent pipeline (admission queue -> worker pool ->
//   merger -> sitemap builder), which stops when the queue stays empty for
//   the quiescence timeout or a limit is reached
// - SequentialCrawler: a plain breadth-first loop with the same rules, used
//   as a baseline
//
// Both only follow links on the root URL's domain, visit every URL at most
// once, and produce a Sitemap.
// =============================================================================

mod builder;
mod engine;
mod filter;
mod queue;
mod sequential;
mod worker;

#[cfg(test)]
mod testing;

pub use engine::{CrawlEngine, StopHandle};
pub use sequential::SequentialCrawler;
