//! Host page collaborator
//!
//! The archiver never owns the page. It reads the current location, takes
//! HTML snapshots for selector queries, and subscribes to a mutation counter
//! that the host bumps whenever the document changes.

use parking_lot::RwLock;
use tokio::sync::watch;

/// Read-only view of the host page
pub trait PageDom: Send + Sync {
    /// Current `location.href`
    fn location(&self) -> String;

    /// Serialized HTML of the current document
    fn snapshot(&self) -> String;

    /// Subscribe to document mutations
    ///
    /// The value is a revision counter; only changes matter. Dropping the
    /// receiver ends the subscription.
    fn observe(&self) -> watch::Receiver<u64>;
}

/// A click captured on the host page
///
/// `target` is a CSS selector that resolves to the clicked element in the
/// snapshot taken at click time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: String,
}

impl ClickEvent {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// In-process document used by the headless driver and the test-suite
#[derive(Debug)]
pub struct InMemoryDom {
    location: RwLock<String>,
    html: RwLock<String>,
    revision: watch::Sender<u64>,
}

impl InMemoryDom {
    #[must_use]
    pub fn new(location: impl Into<String>, html: impl Into<String>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            location: RwLock::new(location.into()),
            html: RwLock::new(html.into()),
            revision,
        }
    }

    /// Replace the document, as a single-page-app render would
    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.write() = html.into();
        self.bump();
    }

    /// Change the location without touching the document (`pushState`)
    pub fn set_location(&self, location: impl Into<String>) {
        *self.location.write() = location.into();
    }

    /// Full navigation: new location and new document
    pub fn navigate(&self, location: impl Into<String>, html: impl Into<String>) {
        self.set_location(location);
        self.set_html(html);
    }

    /// Number of live mutation subscriptions
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.revision.receiver_count()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

impl PageDom for InMemoryDom {
    fn location(&self) -> String {
        self.location.read().clone()
    }

    fn snapshot(&self) -> String {
        self.html.read().clone()
    }

    fn observe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
