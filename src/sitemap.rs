// src/sitemap.rs
// =============================================================================
// The crawl result: a map from every discovered URL to its children.
//
// Rules:
// - A URL becomes a key exactly once, the first time anyone discovers it
// - Keys are never removed, child lists only grow by append
// - A URL is listed as a child only under the page that discovered it first
//
// So the result is a spanning forest over the reachable pages, not the full
// link graph. That's also what makes the tree printer safe: no cycles.
//
// Keys are kept in a BTreeMap so JSON output is sorted and stable.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sitemap {
    pages: BTreeMap<String, Vec<String>>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    // Records the crawl root as a key with no children yet
    pub fn insert_root(&mut self, url: &str) {
        self.pages.entry(url.to_string()).or_default();
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    // Claims `child` for `parent` if nobody has discovered it before
    //
    // Returns true when the child was new: it is appended to the parent's
    // children and becomes a key of its own. Returns false (and changes
    // nothing) when the child is already known.
    pub fn claim(&mut self, parent: &str, child: &str) -> bool {
        if self.pages.contains_key(child) {
            return false;
        }
        self.pages
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
        self.pages.insert(child.to_string(), Vec::new());
        true
    }

    pub fn children(&self, url: &str) -> &[String] {
        self.pages.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    // Writes the sitemap as an indented tree starting at `root`
    //
    // Output format:
    //
    //   ::::: Site Map: https://example.com/ ::::
    //
    //   https://example.com/
    //     https://example.com/about.html
    //       https://example.com/about/team.html
    //
    // With `trim_root`, the root prefix is cut from every line.
    pub fn write_tree<W: Write>(&self, w: &mut W, root: &str, trim_root: bool) -> io::Result<()> {
        writeln!(w, "\n::::: Site Map: {} ::::\n", root)?;

        // Explicit stack instead of recursion; children are pushed in reverse
        // so they pop in stored order
        let mut stack = vec![(root, 0usize)];
        while let Some((url, depth)) = stack.pop() {
            let label = if trim_root {
                url.strip_prefix(root).unwrap_or(url)
            } else {
                url
            };
            writeln!(w, "{:indent$}{}", "", label, indent = depth)?;

            for child in self.children(url).iter().rev() {
                stack.push((child.as_str(), depth + 2));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Sitemap {
        let mut sitemap = Sitemap::new();
        sitemap.insert_root("https://example.com");
        sitemap.claim("https://example.com", "https://example.com/about.html");
        sitemap.claim("https://example.com", "https://example.com/contact.html");
        sitemap.claim("https://example.com/about.html", "https://example.com/about/rev1.html");
        sitemap.claim("https://example.com/about.html", "https://example.com/about/rev2.html");
        sitemap.claim("https://example.com/contact.html", "https://example.com/contact/rev1.html");
        sitemap.claim("https://example.com/contact.html", "https://example.com/contact/rev2.html");
        sitemap
    }

    #[test]
    fn test_claim_only_once() {
        let mut sitemap = Sitemap::new();
        sitemap.insert_root("a");
        assert!(sitemap.claim("a", "b"));
        assert!(sitemap.claim("a", "c"));
        assert!(sitemap.claim("b", "d"));
        assert!(!sitemap.claim("c", "d"));
        // self-links and links back to the root are already known
        assert!(!sitemap.claim("d", "d"));
        assert!(!sitemap.claim("d", "a"));

        assert_eq!(sitemap.children("b"), ["d"]);
        assert!(sitemap.children("c").is_empty());
        assert_eq!(sitemap.len(), 4);
    }

    #[test]
    fn test_serializes_sorted() {
        let got = serde_json::to_string(&example()).unwrap();
        let expected = concat!(
            r#"{"https://example.com":"#,
            r#"["https://example.com/about.html","https://example.com/contact.html"],"#,
            r#""https://example.com/about.html":"#,
            r#"["https://example.com/about/rev1.html","https://example.com/about/rev2.html"],"#,
            r#""https://example.com/about/rev1.html":[],"#,
            r#""https://example.com/about/rev2.html":[],"#,
            r#""https://example.com/contact.html":"#,
            r#"["https://example.com/contact/rev1.html","https://example.com/contact/rev2.html"],"#,
            r#""https://example.com/contact/rev1.html":[],"#,
            r#""https://example.com/contact/rev2.html":[]}"#,
        );
        assert_eq!(got, expected);
    }

    #[test]
    fn test_write_tree() {
        let mut out = Vec::new();
        example().write_tree(&mut out, "https://example.com", false).unwrap();

        let expected = "
::::: Site Map: https://example.com ::::

https://example.com
  https://example.com/about.html
    https://example.com/about/rev1.html
    https://example.com/about/rev2.html
  https://example.com/contact.html
    https://example.com/contact/rev1.html
    https://example.com/contact/rev2.html
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_tree_trimmed() {
        let mut out = Vec::new();
        example().write_tree(&mut out, "https://example.com", true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  /about.html\n    /about/rev1.html\n"));
    }
}
