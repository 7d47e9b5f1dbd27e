// src/crawl/filter.rs
// Keeps the crawl on the root's domain.

use tracing::trace;

// Returns only the links that start with `root`, in their original order.
// Empty strings are dropped too.
pub fn filter_domain(links: Vec<String>, root: &str) -> Vec<String> {
    links
        .into_iter()
        .filter(|link| {
            if link.is_empty() {
                return false;
            }
            let keep = link.starts_with(root);
            if !keep {
                trace!(link = %link, "skip: outside root domain");
            }
            keep
        })
        .collect()
}
