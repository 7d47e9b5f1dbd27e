// src/crawl/queue.rs
// =============================================================================
// The admission queue: where discovered URLs wait before a worker picks them
// up.
//
// It has two parts:
// - a bounded channel that the workers receive from
// - an unbounded backlog (VecDeque) for URLs that don't fit in the channel
//
// submit() never blocks and never drops a URL. It appends to the backlog and
// then moves as many backlog entries as fit into the channel, oldest first.
// Whatever doesn't fit waits for the next submit() or refill().
//
// Why both?
// - A single page can link to hundreds of new pages; the builder must not
//   stall waiting for workers while the workers wait for the builder
// - The bounded channel caps how much work is handed to workers at once
//
// Rust concepts:
// - std::sync::Mutex: the backlog is touched from several tasks but never
//   held across an .await, so a blocking mutex is fine
// - tokio::sync::Mutex: the receiver IS held across .await (recv), so the
//   shared receiver uses the async mutex
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, error::TrySendError};

// Receiving end of the admission channel, shared by every worker
pub type AdmissionReceiver = Arc<tokio::sync::Mutex<mpsc::Receiver<String>>>;

#[derive(Debug)]
pub struct AdmissionQueue {
    backlog: Mutex<VecDeque<String>>,
    sender: mpsc::Sender<String>,
}

impl AdmissionQueue {
    // Creates a queue whose channel holds at most `capacity` URLs
    //
    // `capacity` must be greater than 0 (CrawlConfig::validate checks this).
    pub fn new(capacity: usize) -> (Self, AdmissionReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);
        let queue = Self {
            backlog: Mutex::new(VecDeque::new()),
            sender,
        };
        (queue, Arc::new(tokio::sync::Mutex::new(receiver)))
    }

    // Adds a URL to the queue and pushes as much of the backlog as fits
    pub fn submit(&self, url: String) {
        let mut backlog = self.lock_backlog();
        backlog.push_back(url);
        self.drain(&mut backlog);
    }

    // Pushes as much of the backlog as fits, without adding anything
    //
    // Workers call this right after taking a URL, since that frees a slot.
    pub fn refill(&self) {
        let mut backlog = self.lock_backlog();
        self.drain(&mut backlog);
    }

    // Moves backlog entries into the channel until it's full
    //
    // try_send fails instead of waiting when the channel is at capacity, so
    // the channel can never hold more than `capacity` URLs. The backlog lock
    // is held the whole time, which keeps FIFO order across submitters.
    fn drain(&self, backlog: &mut VecDeque<String>) {
        while let Some(url) = backlog.pop_front() {
            match self.sender.try_send(url) {
                Ok(()) => {}
                Err(TrySendError::Full(url)) | Err(TrySendError::Closed(url)) => {
                    backlog.push_front(url);
                    break;
                }
            }
        }
    }

    // Number of URLs currently sitting in the channel
    pub fn pending(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn backlog_len(&self) -> usize {
        self.lock_backlog().len()
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    // True when there's nothing in the channel and nothing in the backlog
    pub fn is_idle(&self) -> bool {
        self.pending() == 0 && self.backlog_len() == 0
    }

    // A panic while holding the lock can't leave the VecDeque half-updated,
    // so a poisoned lock is still safe to use
    fn lock_backlog(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.backlog.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
