//! Navigation-driven archiving pipeline
//!
//! `handle_page_change` runs one evaluation of the current location:
//!
//! 1. **Evaluating** - canonicalize, compare with Last-Seen, check cooldown
//! 2. **Discovering** - wait for the item container, extract content URLs
//! 3. **Queueing** - enqueue the identity plus discovered URLs
//!
//! and then drains the queue once the evaluation permit is released. Store
//! failures abort the phase and are logged; nothing here is fatal.

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::context::{ArchiverContext, EvaluationGuard, MonitorState};
use crate::canonical::Canonicalizer;
use crate::config::{ArchiverConfig, SiteRules};
use crate::cooldown::CooldownLedger;
use crate::discovery::{ContentDiscoverer, wait_for_element};
use crate::dom::PageDom;
use crate::error::{ArchiveResult, StoreResult};
use crate::notify::Notifier;
use crate::queue::{ArchiveQueue, DrainReport, DrainStatus};
use crate::store::{KvStore, KvStoreExt, keys};
use crate::submit::{Submitter, WaybackClient};
use crate::utils::NOTIFY_SUMMARY_MS;

/// Result of one page evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    /// Archiving is switched off
    Disabled,
    /// The location is not an item page; Last-Seen was cleared
    NotAnItem,
    /// Same item as the previous evaluation
    Duplicate(String),
    /// Item archived within the cooldown window
    OnCooldown(String),
    /// Candidates were handed to the queue
    Queued {
        identity: String,
        /// Identity first, then discovered URLs in document order
        candidates: Vec<String>,
        /// How many candidates were not already queued
        added: usize,
    },
    /// A store failure ended the evaluation early
    Aborted(String),
}

/// The external services the archiver talks to
pub struct Collaborators {
    pub store: Arc<dyn KvStore>,
    pub dom: Arc<dyn PageDom>,
    pub submitter: Arc<dyn Submitter>,
    /// Submitter for [`Archiver::save_now`]; defaults to `submitter`
    pub manual_submitter: Option<Arc<dyn Submitter>>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    #[must_use]
    pub fn new(
        store: Arc<dyn KvStore>,
        dom: Arc<dyn PageDom>,
        submitter: Arc<dyn Submitter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            dom,
            submitter,
            manual_submitter: None,
            notifier,
        }
    }

    /// Wayback clients for both the queue and the manual save command
    #[must_use]
    pub fn wayback(
        config: &ArchiverConfig,
        store: Arc<dyn KvStore>,
        dom: Arc<dyn PageDom>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            manual_submitter: Some(Arc::new(WaybackClient::for_manual_save(config))),
            ..Self::new(store, dom, Arc::new(WaybackClient::for_queue(config)), notifier)
        }
    }

    #[must_use]
    pub fn with_manual_submitter(mut self, submitter: Arc<dyn Submitter>) -> Self {
        self.manual_submitter = Some(submitter);
        self
    }
}

pub struct Archiver {
    pub(super) config: ArchiverConfig,
    pub(super) rules: Arc<SiteRules>,
    canonicalizer: Canonicalizer,
    pub(super) discoverer: ContentDiscoverer,
    pub(super) store: Arc<dyn KvStore>,
    pub(super) queue: ArchiveQueue,
    ledger: CooldownLedger,
    submitter: Arc<dyn Submitter>,
    pub(super) manual_submitter: Arc<dyn Submitter>,
    pub(super) dom: Arc<dyn PageDom>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) ctx: ArchiverContext,
}

impl Archiver {
    /// Build the archiver and load its persisted context
    ///
    /// # Errors
    ///
    /// Returns an error if the enabled flag cannot be read from the store.
    pub async fn start(config: ArchiverConfig, parts: Collaborators) -> ArchiveResult<Arc<Self>> {
        let ctx = ArchiverContext::load(parts.store.as_ref(), config.enabled_default()).await?;
        let rules = config.rules();

        info!(
            "Auto-archiver started (enabled: {}, endpoint: {})",
            ctx.is_enabled(),
            config.archive_endpoint()
        );

        Ok(Arc::new(Self {
            canonicalizer: Canonicalizer::new(Arc::clone(&rules)),
            discoverer: ContentDiscoverer::new(Arc::clone(&rules)),
            queue: ArchiveQueue::new(Arc::clone(&parts.store)),
            ledger: CooldownLedger::new(Arc::clone(&parts.store)),
            manual_submitter: parts
                .manual_submitter
                .unwrap_or_else(|| Arc::clone(&parts.submitter)),
            submitter: parts.submitter,
            store: parts.store,
            dom: parts.dom,
            notifier: parts.notifier,
            rules,
            config,
            ctx,
        }))
    }

    #[must_use]
    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> &ArchiverContext {
        &self.ctx
    }

    #[must_use]
    pub fn queue(&self) -> &ArchiveQueue {
        &self.queue
    }

    #[must_use]
    pub fn ledger(&self) -> &CooldownLedger {
        &self.ledger
    }

    /// Read the persisted enabled flag and refresh the cached copy
    ///
    /// A value of the wrong shape falls back to the configured default.
    pub async fn refresh_enabled(&self) -> StoreResult<bool> {
        let enabled = self
            .store
            .get_lenient(keys::GLOBAL_ENABLED, self.config.enabled_default())
            .await?;
        self.ctx.set_enabled(enabled);
        Ok(enabled)
    }

    /// Evaluate the current location and queue what it references
    ///
    /// Waits for any in-flight evaluation first. A queued item triggers a
    /// drain after the evaluation permit is released.
    pub async fn handle_page_change(&self) -> PageChange {
        let change = {
            let guard = self.ctx.begin_evaluation().await;
            match self.evaluate(&guard).await {
                Ok(change) => change,
                Err(e) => {
                    error!("Error in handle_page_change: {e}");
                    PageChange::Aborted(e.to_string())
                }
            }
        };

        if matches!(change, PageChange::Queued { .. }) {
            self.drain().await;
        }
        change
    }

    async fn evaluate(&self, guard: &EvaluationGuard<'_>) -> ArchiveResult<PageChange> {
        if !self.refresh_enabled().await? {
            return Ok(PageChange::Disabled);
        }

        let location = self.dom.location();
        let Some(identity) = self.canonicalizer.canonicalize(&location) else {
            debug!("Not an item page: {location}");
            self.store.put(keys::LAST_PROCESSED_URL, "").await?;
            return Ok(PageChange::NotAnItem);
        };

        let last_seen: String = self
            .store
            .get_lenient(keys::LAST_PROCESSED_URL, String::new())
            .await?;
        if identity == last_seen {
            debug!("Already handled: {identity}");
            return Ok(PageChange::Duplicate(identity));
        }
        self.store.put(keys::LAST_PROCESSED_URL, &identity).await?;

        if self
            .ledger
            .is_on_cooldown(&identity, self.config.cooldown_window())
            .await?
        {
            info!("Cool-down active for: {identity}");
            return Ok(PageChange::OnCooldown(identity));
        }

        info!("New post detected: {identity}");
        guard.advance(MonitorState::Discovering);

        let mut candidates = vec![identity.clone()];
        match wait_for_element(
            self.dom.as_ref(),
            &self.rules.container,
            None,
            self.config.container_wait(),
        )
        .await
        {
            Some(container) => {
                for url in self.discoverer.extract(&container) {
                    if !candidates.contains(&url) {
                        candidates.push(url);
                    }
                }
            }
            None => debug!("Item container did not render, queueing the item alone"),
        }

        guard.advance(MonitorState::Queueing);
        info!("Found {} total URLs to queue.", candidates.len());
        let added = self.enqueue_all(&candidates).await?;

        Ok(PageChange::Queued {
            identity,
            candidates,
            added,
        })
    }

    /// Enqueue each URL unless already queued; returns how many were added
    pub(super) async fn enqueue_all(&self, urls: &[String]) -> StoreResult<usize> {
        let mut added = 0;
        for url in urls {
            if self.queue.enqueue_if_absent(url).await? {
                added += 1;
            }
        }
        if added > 0 {
            self.notifier.notify("Added to archive queue.");
        }
        Ok(added)
    }

    /// Drain the queue once, unless disabled or already draining
    ///
    /// A completed batch is summarized through the notifier.
    pub async fn drain(&self) -> DrainReport {
        match self.refresh_enabled().await {
            Ok(true) => {}
            Ok(false) => return DrainReport::skipped(DrainStatus::Disabled),
            Err(e) => {
                warn!("Could not read the enabled flag, skipping drain: {e}");
                return DrainReport::skipped(DrainStatus::Aborted);
            }
        }

        match self
            .queue
            .drain(self.submitter.as_ref(), &self.ledger)
            .await
        {
            Ok(report) => {
                if report.status == DrainStatus::Completed {
                    self.notifier.show(
                        &format!(
                            "Archive complete: {} OK, {} failed.",
                            report.succeeded.len(),
                            report.failed.len()
                        ),
                        Duration::from_millis(NOTIFY_SUMMARY_MS),
                    );
                }
                report
            }
            Err(e) => {
                error!("Error while draining the archive queue: {e}");
                DrainReport::skipped(DrainStatus::Aborted)
            }
        }
    }
}
