// src/fetch/http.rs
// =============================================================================
// The real page fetcher: downloads a page over HTTP and returns its links.
//
// Steps for every URL:
// 1. GET the page (redirects are followed, up to 5)
// 2. Reject non-2xx responses
// 3. Reject anything whose Content-Type is not text/html
// 4. Parse the body and extract links, resolved against the final URL
//
// Every failure is returned as a FetchError; the crawler decides what to do
// with it (it logs and moves on).
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use super::html::extract_links;
use super::{FetchError, Fetcher};

// HTTP implementation of the Fetcher trait
//
// Client is cheap to clone (it's reference counted internally) and pools
// connections, so one fetcher is shared by every worker.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a fetcher whose requests give up after `request_timeout`
    pub fn new(request_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_html(&content_type) {
            return Err(FetchError::NotHtml { content_type });
        }

        // Relative links resolve against where we ended up, not where we started
        let base = response.url().clone();
        let body = response.text().await?;

        Ok(extract_links(&body, &base))
    }
}

// "text/html" and "text/html; charset=utf-8" are both HTML
fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
        .unwrap_or(false)
}
