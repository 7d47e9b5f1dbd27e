// src/crawl/worker.rs
// =============================================================================
// Fan-out and fan-in.
//
// launch_workers() starts N workers. Each one loops:
// 1. Take a URL from the shared admission channel
// 2. Fetch it
// 3. Keep only same-domain links
// 4. Send a Page on its own output channel
//
// merge() joins every worker output into one stream for the sitemap builder.
//
// Every .await in a worker races the completion signal, so a worker stops
// promptly even when it's stuck in a slow fetch or waiting on a full output
// channel. When a worker exits, its output channel closes.
// =============================================================================

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::filter::filter_domain;
use super::queue::{AdmissionQueue, AdmissionReceiver};
use crate::fetch::Fetcher;

// A fetched page and its same-domain links, on its way to the builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub children: Vec<String>,
}

// Everything a worker shares with the rest of the pipeline
#[derive(Clone)]
pub struct WorkerContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub queue: Arc<AdmissionQueue>,
    pub inbox: AdmissionReceiver,
    pub root: Arc<str>,
    pub done: CancellationToken,
}

// Starts `count` workers and returns their output channels and task handles
pub fn launch_workers(
    count: usize,
    ctx: WorkerContext,
) -> (Vec<mpsc::Receiver<Page>>, Vec<JoinHandle<()>>) {
    (1..=count)
        .map(|id| {
            // Capacity 1: a worker holds at most one finished page while the
            // builder catches up
            let (tx, rx) = mpsc::channel(1);
            let handle = tokio::spawn(run_worker(id, ctx.clone(), tx));
            (rx, handle)
        })
        .unzip()
}

async fn run_worker(id: usize, ctx: WorkerContext, out: mpsc::Sender<Page>) {
    loop {
        let next = tokio::select! {
            biased;
            _ = ctx.done.cancelled() => break,
            next = async { ctx.inbox.lock().await.recv().await } => next,
        };
        let Some(url) = next else { break };

        // We just freed a slot in the channel
        ctx.queue.refill();

        debug!(worker = id, url = %url, "fetch");
        let links = tokio::select! {
            biased;
            _ = ctx.done.cancelled() => break,
            result = ctx.fetcher.fetch(&url) => match result {
                Ok(links) => links,
                Err(err) if err.is_not_html() => {
                    debug!(worker = id, url = %url, error = %err, "skip: not an HTML page");
                    Vec::new()
                }
                Err(err) => {
                    warn!(worker = id, url = %url, error = %err, "fetch failed");
                    Vec::new()
                }
            },
        };

        let page = Page {
            children: filter_domain(links, &ctx.root),
            url,
        };

        tokio::select! {
            biased;
            _ = ctx.done.cancelled() => break,
            sent = out.send(page) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    debug!(worker = id, "worker exited");
}

// Combines every worker output into one stream
//
// One relay task per input copies pages onto the shared channel. The gate
// task owns the original sender and drops it only after every relay has
// finished, so the merged stream closes exactly when all inputs have closed.
// Pages arrive in completion order; nothing is promised across workers.
pub fn merge(inputs: Vec<mpsc::Receiver<Page>>) -> mpsc::Receiver<Page> {
    let (tx, rx) = mpsc::channel(inputs.len().max(1));

    let relays: Vec<JoinHandle<()>> = inputs
        .into_iter()
        .map(|mut input| {
            let tx = tx.clone();
            tokio::spawn(async move {
                while let Some(page) = input.recv().await {
                    if tx.send(page).await.is_err() {
                        break;
                    }
                }
            })
        })
        .collect();

    tokio::spawn(async move {
        join_all(relays).await;
        drop(tx);
        debug!("merger: all worker outputs closed");
    });

    rx
}
