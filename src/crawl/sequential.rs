// src/crawl/sequential.rs
// =============================================================================
// A single-task, breadth-first crawler.
//
// It applies the same rules as the concurrent engine (domain filter, dedup,
// links_per_page, page_limit, log-and-continue on fetch errors) with none of
// the concurrency, which makes it the baseline to compare the engine against.
//
// How it works:
// 1. Start with the root URL in a queue
// 2. Fetch the page at the front of the queue
// 3. Claim every new same-domain link and add it to the back of the queue
// 4. Repeat until the queue is empty or the page limit is reached
//
// Rust concepts:
// - VecDeque: pop_front()/push_back() give us FIFO, i.e. breadth-first order
// - while let: loop for as long as the queue hands us a URL
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::filter::filter_domain;
use crate::config::CrawlConfig;
use crate::error::{normalize_root, CrawlError};
use crate::fetch::Fetcher;
use crate::sitemap::Sitemap;

pub struct SequentialCrawler {
    fetcher: Arc<dyn Fetcher>,
    page_limit: usize,
    links_per_page: usize,
}

impl SequentialCrawler {
    // Only the page and link limits apply; the rest of the config is about
    // concurrency
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &CrawlConfig) -> Self {
        Self {
            fetcher,
            page_limit: config.page_limit,
            links_per_page: config.links_per_page,
        }
    }

    pub async fn crawl(&self, root_url: &str) -> Result<Sitemap, CrawlError> {
        let root = normalize_root(root_url)?;

        let mut sitemap = Sitemap::new();
        sitemap.insert_root(&root);

        let mut queue = VecDeque::from([root.clone()]);
        let mut processed = 0;

        while let Some(url) = queue.pop_front() {
            let links = match self.fetcher.fetch(&url).await {
                Ok(links) => links,
                Err(err) if err.is_not_html() => {
                    debug!(url = %url, error = %err, "skip: not an HTML page");
                    Vec::new()
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "fetch failed");
                    Vec::new()
                }
            };

            let mut added = 0;
            for link in filter_domain(links, &root) {
                if self.links_per_page > 0 && added >= self.links_per_page {
                    break;
                }
                if sitemap.claim(&url, &link) {
                    info!(url = %link, parent = %url, "add");
                    queue.push_back(link);
                    added += 1;
                }
            }

            processed += 1;
            info!(processed, queue = queue.len(), "links");

            if self.page_limit > 0 && processed >= self.page_limit {
                info!(limit = self.page_limit, "crawl: page limit reached : stop crawling");
                break;
            }
        }

        Ok(sitemap)
    }
}
