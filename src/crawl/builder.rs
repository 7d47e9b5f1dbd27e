// src/crawl/builder.rs
// =============================================================================
// The sitemap builder: the single consumer at the end of the pipeline.
//
// It is the only thing that ever writes to the sitemap, so the sitemap needs
// no lock. For every page that comes out of the merger it:
// 1. Claims each new child (up to links_per_page) and submits it to the
//    admission queue
// 2. Cancels the quiescence timer whenever it submits new work
// 3. Counts the page and stops if page_limit is reached
// 4. Arms a fresh quiescence timer if the queue is now empty
//
// Quiescence:
// There's no shared in-flight counter between the stages. Instead, when the
// queue drains the builder starts a timer; if nothing new shows up before it
// fires, the crawl is over. Because the builder is also the only submitter
// (apart from the seed), it knows exactly how many submitted pages it hasn't
// seen back yet. A timer that fires while pages are still outstanding, or a
// stale timer from an older generation, is ignored.
// =============================================================================

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::queue::AdmissionQueue;
use super::worker::Page;
use crate::config::CrawlConfig;
use crate::sitemap::Sitemap;

pub struct SitemapBuilder {
    sitemap: Sitemap,
    queue: Arc<AdmissionQueue>,
    done: CancellationToken,
    quiescence_timeout: Duration,
    page_limit: usize,
    links_per_page: usize,
    processed: usize,
    // Submitted to the queue but not yet seen back as a Page
    outstanding: usize,
    timer: Option<CancellationToken>,
    generation: u64,
    quiet_tx: mpsc::UnboundedSender<u64>,
    quiet_rx: mpsc::UnboundedReceiver<u64>,
}

impl SitemapBuilder {
    // `root` must already be submitted to `queue` by the caller; it counts as
    // the first outstanding page
    pub fn new(
        root: &str,
        queue: Arc<AdmissionQueue>,
        done: CancellationToken,
        config: &CrawlConfig,
    ) -> Self {
        let mut sitemap = Sitemap::new();
        sitemap.insert_root(root);
        let (quiet_tx, quiet_rx) = mpsc::unbounded_channel();

        Self {
            sitemap,
            queue,
            done,
            quiescence_timeout: config.quiescence_timeout,
            page_limit: config.page_limit,
            links_per_page: config.links_per_page,
            processed: 0,
            outstanding: 1,
            timer: None,
            generation: 0,
            quiet_tx,
            quiet_rx,
        }
    }

    pub fn spawn(self, pages: mpsc::Receiver<Page>) -> JoinHandle<Sitemap> {
        tokio::spawn(self.run(pages))
    }

    pub async fn run(mut self, mut pages: mpsc::Receiver<Page>) -> Sitemap {
        loop {
            tokio::select! {
                biased;
                _ = self.done.cancelled() => {
                    info!("crawl: stop requested");
                    break;
                }
                Some(generation) = self.quiet_rx.recv() => {
                    if self.is_quiescent(generation) {
                        info!(timeout = ?self.quiescence_timeout, "queue: empty : crawl converged");
                        break;
                    }
                    debug!(
                        generation,
                        outstanding = self.outstanding,
                        "queue: stale quiescence timer ignored"
                    );
                }
                page = pages.recv() => match page {
                    Some(page) => {
                        if self.record(page).is_break() {
                            break;
                        }
                    }
                    None => {
                        debug!("crawl: page stream closed");
                        break;
                    }
                },
            }
        }

        self.cancel_timer();
        // Tell every other stage to wind down; a second cancel is a no-op
        self.done.cancel();
        info!(pages = self.processed, urls = self.sitemap.len(), "crawl: finished");
        self.sitemap
    }

    fn record(&mut self, page: Page) -> ControlFlow<()> {
        self.outstanding = self.outstanding.saturating_sub(1);

        // Children found on the last page we'll process are recorded but never
        // fetched, so there's no point queueing them
        let last_page = self.page_limit > 0 && self.processed + 1 >= self.page_limit;

        let mut added = 0;
        for child in page.children {
            if self.links_per_page > 0 && added >= self.links_per_page {
                break;
            }
            if !self.sitemap.claim(&page.url, &child) {
                continue;
            }
            info!(url = %child, parent = %page.url, "add");
            added += 1;

            if !last_page {
                self.queue.submit(child);
                self.outstanding += 1;
                self.cancel_timer();
            }
        }

        self.processed += 1;
        info!(
            processed = self.processed,
            queue = self.queue.pending(),
            backlog = self.queue.backlog_len(),
            "links"
        );

        if last_page {
            info!(limit = self.page_limit, "crawl: page limit reached : stop crawling");
            return ControlFlow::Break(());
        }

        if self.queue.is_idle() {
            self.arm_timer();
        }
        ControlFlow::Continue(())
    }

    fn is_quiescent(&self, generation: u64) -> bool {
        generation == self.generation
            && self.timer.is_some()
            && self.outstanding == 0
            && self.queue.is_idle()
    }

    // Starts a new quiescence timer, replacing any live one
    fn arm_timer(&mut self) {
        self.cancel_timer();
        self.generation += 1;

        // Child of the completion token, so shutting down also stops the timer
        let token = self.done.child_token();
        self.timer = Some(token.clone());

        let generation = self.generation;
        let timeout = self.quiescence_timeout;
        let quiet_tx = self.quiet_tx.clone();
        debug!(?timeout, generation, "queue: empty : start quiescence timer");

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "queue: quiescence timer cancelled");
                }
                _ = tokio::time::sleep(timeout) => {
                    // The builder may already be gone; nothing to tell then
                    let _ = quiet_tx.send(generation);
                }
            }
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::queue::AdmissionReceiver;

    const ROOT: &str = "https://example.com/";

    fn page(url: &str, children: &[&str]) -> Page {
        Page {
            url: url.to_string(),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    // The inbox is returned so the admission channel stays open
    fn builder(config: CrawlConfig) -> (SitemapBuilder, Arc<AdmissionQueue>, AdmissionReceiver) {
        let (queue, inbox) = AdmissionQueue::new(config.queue_capacity);
        let queue = Arc::new(queue);
        let builder = SitemapBuilder::new(ROOT, queue.clone(), CancellationToken::new(), &config);
        (builder, queue, inbox)
    }

    #[tokio::test]
    async fn test_record_dedups_and_submits() {
        let (mut builder, queue, _inbox) = builder(CrawlConfig::default());

        let flow = builder.record(page(
            ROOT,
            &["https://example.com/a", "https://example.com/b", ROOT],
        ));
        assert!(flow.is_continue());
        let flow = builder.record(page(
            "https://example.com/a",
            &["https://example.com/b", "https://example.com/c"],
        ));
        assert!(flow.is_continue());

        assert_eq!(
            builder.sitemap.children(ROOT),
            ["https://example.com/a", "https://example.com/b"]
        );
        assert_eq!(builder.sitemap.children("https://example.com/a"), ["https://example.com/c"]);
        assert_eq!(builder.sitemap.len(), 4);
        assert_eq!(queue.pending(), 3);
        assert_eq!(builder.outstanding, 2);
    }

    #[tokio::test]
    async fn test_links_per_page_counts_new_links_only() {
        let (mut builder, queue, _inbox) = builder(CrawlConfig {
            links_per_page: 1,
            ..Default::default()
        });

        let _ = builder.record(page(ROOT, &["https://example.com/a"]));
        let _ = builder.record(page(
            "https://example.com/a",
            &[ROOT, "https://example.com/b", "https://example.com/c"],
        ));

        assert_eq!(builder.sitemap.children("https://example.com/a"), ["https://example.com/b"]);
        assert!(!builder.sitemap.contains("https://example.com/c"));
        assert_eq!(queue.pending(), 2);
    }

    #[tokio::test]
    async fn test_page_limit_records_but_does_not_submit() {
        let (mut builder, queue, _inbox) = builder(CrawlConfig {
            page_limit: 1,
            ..Default::default()
        });

        let flow = builder.record(page(ROOT, &["https://example.com/a", "https://example.com/b"]));

        assert!(flow.is_break());
        assert!(builder.sitemap.contains("https://example.com/a"));
        assert!(builder.sitemap.contains("https://example.com/b"));
        assert!(queue.is_idle());
    }

    #[tokio::test]
    async fn test_new_work_cancels_timer() {
        let (mut builder, _queue, _inbox) = builder(CrawlConfig::default());

        builder.arm_timer();
        let first = builder.timer.clone().unwrap();
        let _ = builder.record(page(ROOT, &["https://example.com/a"]));

        assert!(first.is_cancelled());
        // The queue isn't empty, so no new timer was armed
        assert!(builder.timer.is_none());
    }

    #[tokio::test]
    async fn test_stale_generation_is_not_quiescent() {
        let (mut builder, _queue, _inbox) = builder(CrawlConfig::default());
        let _ = builder.record(page(ROOT, &[]));

        assert!(builder.timer.is_some());
        assert!(builder.is_quiescent(builder.generation));
        assert!(!builder.is_quiescent(builder.generation - 1));
    }

    #[tokio::test]
    async fn test_timer_ignored_while_pages_outstanding() {
        let (mut builder, queue, inbox) = builder(CrawlConfig::default());
        let _ = builder.record(page(ROOT, &["https://example.com/a", "https://example.com/b"]));

        // Workers have taken both URLs but haven't reported back yet
        {
            let mut inbox = inbox.lock().await;
            assert_eq!(inbox.recv().await.as_deref(), Some("https://example.com/a"));
            assert_eq!(inbox.recv().await.as_deref(), Some("https://example.com/b"));
        }
        assert!(queue.is_idle());

        builder.arm_timer();
        assert_eq!(builder.outstanding, 2);
        assert!(!builder.is_quiescent(builder.generation));

        let _ = builder.record(page("https://example.com/a", &[]));
        assert!(!builder.is_quiescent(builder.generation));
        let _ = builder.record(page("https://example.com/b", &[]));
        assert!(builder.is_quiescent(builder.generation));
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel_and_cancels_twice_safely() {
        let (builder, _queue, _inbox) = builder(CrawlConfig::default());
        let done = builder.done.clone();
        let (_tx, rx) = mpsc::channel(1);
        let handle = builder.spawn(rx);

        done.cancel();
        done.cancel();

        let sitemap = handle.await.unwrap();
        assert!(sitemap.contains(ROOT));
    }
}
