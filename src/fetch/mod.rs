// src/fetch/mod.rs
// =============================================================================
// This module defines how the crawler gets the links out of a page.
//
// Submodules:
// - http: Fetches a page over HTTP and checks that it is an HTML document
// - html: Extracts and resolves anchor links from HTML text
//
// The crawl engine only ever talks to the `Fetcher` trait, so tests can swap
// the real HTTP client for an in-memory stub.
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpFetcher;

// Everything that can go wrong while fetching a single page.
//
// None of these stop a crawl: the page is treated as having no children.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The response was not an HTML document
    #[error("page is not HTML (content-type: {content_type:?})")]
    NotHtml { content_type: String },

    /// The server answered with a non-success status code
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request itself failed (DNS, connect, timeout, body read...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_not_html(&self) -> bool {
        matches!(self, FetchError::NotHtml { .. })
    }
}

// Given a URL, return the raw outbound links found on that page.
//
// Links come back absolute and in document order. No domain filtering
// happens here; that's the crawler's job.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError>;
}
