//! Site profile: the markup conventions of the archived site
//!
//! Everything that couples the archiver to one particular site's layout lives
//! here as plain data: the short-link host, the canonical origin, the
//! self-host pattern and the CSS selector allowlists. `SiteRules` is the
//! compiled form used at runtime.

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Serializable description of a site's URL and markup conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// Host whose whole path is an item id (`redd.it/<id>`)
    pub short_link_host: String,
    /// Origin every canonical identity is built on, without trailing slash
    pub canonical_origin: String,
    /// Regex matched against a URL's host to recognise self-links
    pub self_host_pattern: String,
    /// Selector for the element wrapping one item
    pub container_selector: String,
    /// Selectors whose `src`/`href` point at an item's content
    pub content_selectors: Vec<String>,
    /// Media inside a root-relative anchor used to recover the media host
    pub inner_media_selector: String,
    /// Buttons that reveal interstitially hidden content when clicked
    pub reveal_button_selectors: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            short_link_host: "redd.it".to_string(),
            canonical_origin: "https://old.reddit.com".to_string(),
            self_host_pattern: r"reddit\.com|redd\.it".to_string(),
            container_selector: "shreddit-post, div.thing".to_string(),
            content_selectors: vec![
                r#"a[data-click-id="body"]"#.to_string(),
                "a.title".to_string(),
                r#"div[data-test-id="post-content"] a"#.to_string(),
                ".expando .md a".to_string(),
                "div[data-media-container] a".to_string(),
                "shreddit-player[src]".to_string(),
                "iframe[src]".to_string(),
                "a.videoLink".to_string(),
            ],
            inner_media_selector: "video[poster], img[src]".to_string(),
            reveal_button_selectors: vec![
                ".nsfw-see-more button".to_string(),
                r#"div[data-testid="post-content"] button"#.to_string(),
                r#"button[data-testid="nsfw-button-ok"]"#.to_string(),
            ],
        }
    }
}

/// Compiled, immutable form of a [`SiteProfile`]
#[derive(Debug)]
pub struct SiteRules {
    pub short_link_host: String,
    pub canonical_origin: String,
    pub self_host: Regex,
    pub container: Selector,
    pub content: Selector,
    pub inner_media: Selector,
    pub reveal_button: Selector,
}

impl SiteRules {
    /// Compile every pattern and selector of a profile
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first pattern that fails to parse.
    pub fn compile(profile: &SiteProfile) -> Result<Self, ConfigError> {
        if profile.short_link_host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "short_link_host must not be empty".to_string(),
            ));
        }

        let origin = profile.canonical_origin.trim_end_matches('/');
        if !crate::utils::is_valid_url(origin) {
            return Err(ConfigError::Invalid(format!(
                "canonical_origin '{}' is not an http(s) URL",
                profile.canonical_origin
            )));
        }

        let self_host = Regex::new(&profile.self_host_pattern).map_err(|e| {
            ConfigError::Pattern {
                pattern: profile.self_host_pattern.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            short_link_host: profile.short_link_host.to_ascii_lowercase(),
            canonical_origin: origin.to_string(),
            self_host,
            container: parse_selector(&profile.container_selector)?,
            content: parse_selector_list(&profile.content_selectors)?,
            inner_media: parse_selector(&profile.inner_media_selector)?,
            reveal_button: parse_selector_list(&profile.reveal_button_selectors)?,
        })
    }

    /// Whether a host belongs to the archived site itself
    #[must_use]
    pub fn is_self_host(&self, host: &str) -> bool {
        self.self_host.is_match(host)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Join a selector allowlist into one selector group (`a, b, c`)
fn parse_selector_list(selectors: &[String]) -> Result<Selector, ConfigError> {
    if selectors.is_empty() {
        return Err(ConfigError::Invalid(
            "selector list must not be empty".to_string(),
        ));
    }
    parse_selector(&selectors.join(", "))
}
