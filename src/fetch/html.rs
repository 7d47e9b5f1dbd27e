// src/fetch/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate to parse the document and find every <a href>,
// and the `url` crate to resolve relative links against the page URL.
//
// Differences from a plain "grab every href":
// - Fragments are stripped, so /docs#intro and /docs are the same page
// - Only http/https links survive (mailto:, tel:, javascript: are dropped)
// - Document order is preserved, because the sitemap records children in
//   first-discovery order
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts all crawlable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base: the URL the page was actually served from (after redirects)
//
// Returns: absolute URLs in the order they appear in the document
//
// Example:
//   html = "<a href='/docs#top'>Docs</a>"
//   base = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(base, href))
        .collect()
}

// Resolves a possibly-relative href to an absolute, fragment-free URL
//
// Url::join handles both cases: an absolute href replaces the base entirely,
// a relative one is resolved the way a browser would.
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);

    Some(url.to_string())
}
