// src/error.rs
// =============================================================================
// Setup errors: everything that can stop a crawl before the first fetch.
//
// Once the pipeline is running there is no error path back to the caller;
// per-page failures are logged where they happen (see fetch::FetchError).
// The one exception is the runtime tearing the crawl down from under us.
// =============================================================================

use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid root URL '{url}': {source}")]
    InvalidRootUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("root URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("root URL '{0}' has no host")]
    MissingHost(String),

    #[error("invalid crawl configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("crawl was cancelled before the sitemap was built")]
    Cancelled,
}

// Validates a root URL and returns its normalized form
//
// The normalized form is also the domain prefix every discovered link must
// start with, so "https://example.com" becomes "https://example.com/" and
// "https://example.com.evil.net" can't sneak past the filter.
pub fn normalize_root(root_url: &str) -> Result<String, CrawlError> {
    let url = Url::parse(root_url.trim()).map_err(|source| CrawlError::InvalidRootUrl {
        url: root_url.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CrawlError::UnsupportedScheme(root_url.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::MissingHost(root_url.to_string()));
    }

    Ok(url.to_string())
}
