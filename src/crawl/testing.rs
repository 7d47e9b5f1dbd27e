// src/crawl/testing.rs
// In-memory Fetcher for crawler tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::fetch::{FetchError, Fetcher};

// Serves a fixed link map. Unknown URLs have no links.
#[derive(Debug, Default)]
pub struct StubFetcher {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    not_html: HashSet<String>,
    delay: Option<Duration>,
    fetched: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new<'a>(pages: impl IntoIterator<Item = (&'a str, Vec<&'a str>)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, links)| {
                    (url.to_string(), links.into_iter().map(String::from).collect())
                })
                .collect(),
            ..Default::default()
        }
    }

    // `url` answers with HTTP 500
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    // `url` is served with a non-HTML content type
    pub fn not_html(mut self, url: &str) -> Self {
        self.not_html.insert(url.to_string());
        self
    }

    // Every fetch sleeps this long first
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    // URLs fetched so far, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        if self.not_html.contains(url) {
            return Err(FetchError::NotHtml {
                content_type: "application/pdf".to_string(),
            });
        }

        Ok(self.pages.get(url).cloned().unwrap_or_default())
    }
}
