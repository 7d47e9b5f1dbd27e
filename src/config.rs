// src/config.rs
// =============================================================================
// Settings for a crawl, passed into the engine as a plain value.
//
// The CLI builds one of these from its flags; tests build them directly with
// struct update syntax: CrawlConfig { page_limit: 1, ..Default::default() }
// =============================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Number of parallel fetch workers
    pub workers: usize,
    /// How many URLs may sit in the admission channel at once
    pub queue_capacity: usize,
    /// How long the queue must stay empty before the crawl is considered done
    pub quiescence_timeout: Duration,
    /// Stop after this many pages have been processed (0 = no limit)
    pub page_limit: usize,
    /// Accept at most this many new links from a single page (0 = no limit)
    pub links_per_page: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            queue_capacity: 500,
            quiescence_timeout: Duration::from_secs(5),
            page_limit: 0,
            links_per_page: 0,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be greater than 0")]
    NoWorkers,

    #[error("queue capacity must be greater than 0")]
    NoQueueCapacity,

    #[error("quiescence timeout must be greater than 0")]
    NoQuiescenceTimeout,
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::NoQueueCapacity);
        }
        if self.quiescence_timeout.is_zero() {
            return Err(ConfigError::NoQuiescenceTimeout);
        }
        Ok(())
    }
}
