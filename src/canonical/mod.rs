//! Item canonicalization
//!
//! Maps any navigated URL to the one identity string of the item it shows,
//! or to `None` when the page is not an item (listings, profiles, search).
//! Slug, query, fragment and host variant (`www`, `old`, `np`, short links)
//! all collapse to `<canonical-origin>/comments/<id>`.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::config::SiteRules;

/// `/comments/<id>` or `/gallery/<id>` anywhere in the path
static ITEM_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:comments|gallery)/([a-z0-9]+)")
        .expect("BUG: hardcoded item path pattern is invalid")
});

#[derive(Debug, Clone)]
pub struct Canonicalizer {
    rules: Arc<SiteRules>,
}

impl Canonicalizer {
    #[must_use]
    pub fn new(rules: Arc<SiteRules>) -> Self {
        Self { rules }
    }

    /// Canonical identity of the item behind `raw`, if it is one
    ///
    /// Total: malformed input yields `None`, never a panic.
    #[must_use]
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let url = Url::parse(raw).ok()?;
        let host = url.host_str()?;

        let id = if host.eq_ignore_ascii_case(&self.rules.short_link_host) {
            short_link_id(url.path())?
        } else {
            ITEM_PATH
                .captures(url.path())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())?
        };

        Some(format!("{}/comments/{id}", self.rules.canonical_origin))
    }
}

/// Path of a short link with one leading and one trailing slash removed
fn short_link_id(path: &str) -> Option<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
