//! Bounded wait for late-rendered elements
//!
//! Checks the current snapshot first, then re-checks on every mutation
//! notification until a match appears or the timeout elapses. The
//! subscription is a scoped guard, so the observer is released on every exit
//! path, including cancellation of the surrounding future.

use scraper::{Html, Selector};
use std::time::Duration;
use tokio::sync::watch;

use crate::dom::PageDom;

/// A live mutation subscription, released on drop
pub struct MutationSubscription {
    rx: watch::Receiver<u64>,
}

impl MutationSubscription {
    #[must_use]
    pub fn attach(dom: &dyn PageDom) -> Self {
        let mut rx = dom.observe();
        rx.mark_unchanged();
        Self { rx }
    }

    /// Resolve on the next mutation; `false` once the host page is gone
    pub async fn next_mutation(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl Drop for MutationSubscription {
    fn drop(&mut self) {
        tracing::trace!("Mutation observer disconnected");
    }
}

/// Outer HTML of the first element matching `selector` in a snapshot
#[must_use]
pub fn find_in_snapshot(html: &str, selector: &Selector) -> Option<String> {
    find_within(html, selector, None)
}

/// Like [`find_in_snapshot`], restricted to the descendants of the first
/// element matching `scope`
#[must_use]
pub fn find_within(html: &str, selector: &Selector, scope: Option<&Selector>) -> Option<String> {
    let document = Html::parse_document(html);
    let found = match scope {
        None => document.select(selector).next(),
        Some(scope) => document.select(scope).next()?.select(selector).next(),
    };
    found.map(|el| el.html())
}

/// Wait up to `timeout` for an element matching `selector`
///
/// With a `scope`, only descendants of the first element matching it count;
/// a scope that has not rendered yet is waited for like the element itself.
/// Returns the outer HTML of the first match, or `None` on timeout or when
/// the host stops publishing mutations.
pub async fn wait_for_element(
    dom: &dyn PageDom,
    selector: &Selector,
    scope: Option<&Selector>,
    timeout: Duration,
) -> Option<String> {
    // Subscribe before the first check so a mutation landing in between is
    // not lost.
    let mut subscription = MutationSubscription::attach(dom);

    if let Some(found) = find_within(&dom.snapshot(), selector, scope) {
        return Some(found);
    }

    let watch_loop = async {
        while subscription.next_mutation().await {
            if let Some(found) = find_within(&dom.snapshot(), selector, scope) {
                return Some(found);
            }
        }
        None
    };

    match tokio::time::timeout(timeout, watch_loop).await {
        Ok(found) => found,
        Err(_) => {
            tracing::debug!("No element matched within {timeout:?}");
            None
        }
    }
}
