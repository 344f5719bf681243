//! Test utilities and helper functions for the auto-archiver test suite

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};

use kodegen_tools_autoarchive::{
    Archiver, ArchiverConfig, ChannelNotifier, Collaborators, InMemoryDom, MemoryStore,
    Notification, SubmitOutcome, Submitter,
};

/// Blocks a submission until the test releases it
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// Scripted submitter recording every call
///
/// Unscripted URLs succeed with 200.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockSubmitter {
    script: Mutex<HashMap<String, VecDeque<SubmitOutcome>>>,
    fallback: Mutex<Option<SubmitOutcome>>,
    gates: Mutex<HashMap<String, Gate>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockSubmitter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue outcomes for `url`, consumed one per call
    pub fn script(&self, url: &str, outcomes: impl IntoIterator<Item = SubmitOutcome>) {
        self.script
            .lock()
            .entry(url.to_string())
            .or_default()
            .extend(outcomes);
    }

    /// Outcome for calls nothing was scripted for
    pub fn fail_everything(&self, outcome: SubmitOutcome) {
        *self.fallback.lock() = Some(outcome);
    }

    pub fn succeed_everything(&self) {
        *self.fallback.lock() = None;
    }

    /// Hold submissions of `url` until the returned gate is released
    pub fn hold(&self, url: &str) -> Gate {
        let gate = Gate::default();
        self.gates.lock().insert(url.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == url).count()
    }
}

impl Submitter for MockSubmitter {
    fn submit<'a>(&'a self, url: &'a str) -> BoxFuture<'a, SubmitOutcome> {
        Box::pin(async move {
            self.calls.lock().push(url.to_string());

            let gate = self.gates.lock().get(url).cloned();
            if let Some(gate) = gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }

            let scripted = self.script.lock().get_mut(url).and_then(VecDeque::pop_front);
            scripted
                .or_else(|| self.fallback.lock().clone())
                .unwrap_or(SubmitOutcome::Archived { status: 200 })
        })
    }
}

/// Route log and tracing output through the test writer (`RUST_LOG`)
#[allow(dead_code)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config with short timings so pipeline tests finish quickly
#[allow(dead_code)]
pub fn fast_config() -> ArchiverConfig {
    ArchiverConfig::builder()
        .debounce_ms(20)
        .container_wait_ms(200)
        .reveal_settle_ms(20)
        .save_rearm_ms(0)
        .build()
        .expect("Failed to create test config")
}

/// A running archiver wired to in-memory collaborators
#[allow(dead_code)]
pub struct Harness {
    pub archiver: Arc<Archiver>,
    pub store: Arc<MemoryStore>,
    pub dom: Arc<InMemoryDom>,
    pub submitter: Arc<MockSubmitter>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

#[allow(dead_code)]
impl Harness {
    pub async fn new(location: &str, html: &str) -> Self {
        Self::with_store(fast_config(), Arc::new(MemoryStore::new()), location, html).await
    }

    pub async fn with_store(
        config: ArchiverConfig,
        store: Arc<MemoryStore>,
        location: &str,
        html: &str,
    ) -> Self {
        init_test_logging();
        let dom = Arc::new(InMemoryDom::new(location, html));
        let submitter = MockSubmitter::new();
        let (notifier, notifications) = ChannelNotifier::new();

        let parts = Collaborators::new(
            store.clone(),
            dom.clone(),
            submitter.clone(),
            Arc::new(notifier),
        );
        let archiver = Archiver::start(config, parts)
            .await
            .expect("Failed to start archiver");

        Self {
            archiver,
            store,
            dom,
            submitter,
            notifications,
        }
    }

    /// URLs currently persisted in the queue
    pub async fn queued_urls(&self) -> Vec<String> {
        self.archiver
            .queue()
            .snapshot()
            .await
            .expect("queue snapshot")
            .into_iter()
            .map(|task| task.url)
            .collect()
    }

    /// Every notification delivered so far
    pub fn drain_notifications(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            messages.push(notification.message);
        }
        messages
    }
}

/// Canonical identity of a post id under the default profile
#[allow(dead_code)]
pub fn identity(id: &str) -> String {
    format!("https://old.reddit.com/comments/{id}")
}

/// Old-layout item page: title link plus self-text links
#[allow(dead_code)]
pub fn post_page(title_href: &str, body_links: &[&str]) -> String {
    let links: String = body_links
        .iter()
        .map(|href| format!(r#"<a href="{href}">link</a>"#))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <div id="siteTable">
    <div class="thing">
      <a class="title" href="{title_href}">title</a>
      <div class="expando"><div class="md">{links}</div></div>
    </div>
  </div>
</body>
</html>"#
    )
}

/// Item page whose media sits behind a reveal interstitial
#[allow(dead_code)]
pub fn hidden_post_page(revealed_links: &[&str]) -> String {
    let links: String = revealed_links
        .iter()
        .map(|href| format!(r#"<a href="{href}">media</a>"#))
        .collect();
    format!(
        r#"<html><body>
  <div class="thing" id="first"><a class="title" href="https://example.org/other">other</a></div>
  <div class="thing" id="hidden">
    <div class="nsfw-see-more"><button id="reveal"><span id="reveal-label">See more</span></button></div>
    <div class="expando"><div class="md">{links}</div></div>
  </div>
</body></html>"#
    )
}

/// Listing page without any item container
#[allow(dead_code)]
pub fn listing_page() -> String {
    r#"<html><body><div id="siteTable"><p>front page</p></div></body></html>"#.to_string()
}
