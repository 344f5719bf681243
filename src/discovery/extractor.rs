//! Content URL extraction from an item container
//!
//! The rules are a site-coupled allowlist, not a general extraction
//! algorithm: each match contributes its `src` (embeds, players) or `href`
//! (outbound links). Root-relative anchors wrapping media are rebuilt on the
//! media's own registrable host, which is how embedded third-party players
//! expose their canonical page.

use scraper::{ElementRef, Html};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use crate::config::SiteRules;
use crate::utils::{absolutize_protocol_relative, registrable_host};

#[derive(Debug, Clone)]
pub struct ContentDiscoverer {
    rules: Arc<SiteRules>,
}

impl ContentDiscoverer {
    #[must_use]
    pub fn new(rules: Arc<SiteRules>) -> Self {
        Self { rules }
    }

    /// Extract content URLs from the serialized HTML of one container
    #[must_use]
    pub fn extract(&self, container_html: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(container_html);
        self.extract_from(fragment.root_element())
    }

    /// Extract content URLs from the subtree under `container`
    ///
    /// Only descendants of `container` are considered. The result holds no
    /// duplicates and keeps first-seen order.
    #[must_use]
    pub fn extract_from(&self, container: ElementRef<'_>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for element in container.select(&self.rules.content) {
            let Some(candidate) = self.candidate_for(element) else {
                continue;
            };

            if !candidate.starts_with("http") {
                continue;
            }

            let host = match Url::parse(&candidate) {
                Ok(parsed) => match parsed.host_str() {
                    Some(host) => host.to_ascii_lowercase(),
                    None => continue,
                },
                Err(e) => {
                    tracing::trace!("Ignoring unparseable candidate {candidate}: {e}");
                    continue;
                }
            };

            if self.rules.is_self_host(&host) {
                continue;
            }

            if seen.insert(candidate.clone()) {
                urls.push(candidate);
            }
        }

        urls
    }

    /// Raw candidate URL for one matched element
    fn candidate_for(&self, element: ElementRef<'_>) -> Option<String> {
        let value = element.value();
        let href = value.attr("href");
        let candidate = value.attr("src").or(href)?;

        if value.name() == "a"
            && let Some(href) = href
            && href.starts_with('/')
            && !href.starts_with("//")
            && let Some(rebuilt) = self.rebuild_on_media_host(element, href)
        {
            tracing::debug!("Constructed URL: {rebuilt}");
            return Some(rebuilt);
        }

        Some(absolutize_protocol_relative(candidate))
    }

    /// `https://<media host minus subdomains><href>` for an anchor wrapping media
    fn rebuild_on_media_host(&self, anchor: ElementRef<'_>, href: &str) -> Option<String> {
        let media = anchor.select(&self.rules.inner_media).next()?;
        let source = media
            .value()
            .attr("poster")
            .filter(|p| !p.is_empty())
            .or_else(|| media.value().attr("src"))?;

        let source = Url::parse(&absolutize_protocol_relative(source)).ok()?;
        let origin_host = registrable_host(source.host_str()?);
        Some(format!("https://{origin_host}{href}"))
    }
}
