// src/crawl/engine.rs
// =============================================================================
// The concurrent crawl engine: wires the pipeline together and runs it.
//
//   seed ─► admission queue ─► workers ─► merger ─► builder
//                 ▲                                    │
//                 └─────── newly discovered URLs ──────┘
//
// The engine owns one completion token. Everything in the pipeline watches
// it; the builder cancels it when the crawl converges or hits the page limit,
// and a StopHandle can cancel it from outside.
// =============================================================================

use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::builder::SitemapBuilder;
use super::queue::AdmissionQueue;
use super::worker::{launch_workers, merge, WorkerContext};
use crate::config::CrawlConfig;
use crate::error::{normalize_root, CrawlError};
use crate::fetch::Fetcher;
use crate::sitemap::Sitemap;

pub struct CrawlEngine {
    fetcher: Arc<dyn Fetcher>,
    config: CrawlConfig,
    done: CancellationToken,
}

// Stops a running crawl; the run then returns what it has mapped so far
//
// Calling stop() more than once is harmless.
#[derive(Debug, Clone)]
pub struct StopHandle {
    done: CancellationToken,
}

impl StopHandle {
    pub fn stop(&self) {
        self.done.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.done.is_cancelled()
    }
}

impl CrawlEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        Ok(Self {
            fetcher,
            config,
            done: CancellationToken::new(),
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            done: self.done.clone(),
        }
    }

    // Crawls everything reachable from `root_url` on the same domain
    //
    // Fails only if the root URL is unusable, and then before anything is
    // fetched. Consumes the engine: its completion signal fires once.
    pub async fn run(self, root_url: &str) -> Result<Sitemap, CrawlError> {
        let root = normalize_root(root_url)?;
        let config = &self.config;

        let (queue, inbox) = AdmissionQueue::new(config.queue_capacity);
        let queue = Arc::new(queue);

        let ctx = WorkerContext {
            fetcher: self.fetcher.clone(),
            queue: queue.clone(),
            inbox,
            root: Arc::from(root.as_str()),
            done: self.done.clone(),
        };
        let (outputs, workers) = launch_workers(config.workers, ctx);
        let pages = merge(outputs);

        let builder =
            SitemapBuilder::new(&root, queue.clone(), self.done.clone(), config).spawn(pages);

        info!(
            root = %root,
            workers = config.workers,
            queue_capacity = queue.capacity(),
            "crawl: started"
        );
        queue.submit(root);

        let sitemap = finished_sitemap(builder.await);

        // The builder has fired the completion signal; wait for workers to see it
        for result in join_all(workers).await {
            if let Err(err) = result {
                error!(error = %err, "crawl: worker task failed");
            }
        }

        sitemap
    }
}

// Unwraps the builder's result
//
// A panic in the builder is a bug and is re-raised here. A cancelled builder
// only happens when the runtime is shutting down underneath us.
fn finished_sitemap(result: Result<Sitemap, JoinError>) -> Result<Sitemap, CrawlError> {
    match result {
        Ok(sitemap) => Ok(sitemap),
        Err(err) => match err.try_into_panic() {
            Ok(panic) => std::panic::resume_unwind(panic),
            Err(err) => {
                warn!(error = %err, "crawl: sitemap builder was cancelled");
                Err(CrawlError::Cancelled)
            }
        },
    }
}
