//! Persistent archive queue
//!
//! An ordered list of pending submissions stored under one key. Enqueue is a
//! non-atomic read-modify-write with advisory de-duplication. Drains are
//! serialized by an in-memory permit and reconcile by recomputation: after
//! the batch, the queue is re-read and only the URLs that succeeded (plus
//! corrupted entries) are removed from that fresh copy. Tasks enqueued while
//! the batch was in flight survive, failed tasks are never touched, and a
//! concurrent removal is never undone.

pub mod task;

use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cooldown::CooldownLedger;
use crate::error::StoreResult;
use crate::store::{KvStore, keys};
use crate::submit::Submitter;
use crate::utils::now_millis;

pub use task::QueueTask;

/// How a drain call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStatus {
    /// A batch was processed
    Completed,
    /// Another drain held the permit; nothing was done
    AlreadyRunning,
    /// The queue was empty
    Empty,
    /// Archiving is switched off
    Disabled,
    /// A store failure ended the drain early
    Aborted,
}

/// Summary of one drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    pub status: DrainStatus,
    /// Number of entries in the snapshot, corrupted ones included
    pub batch_size: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    /// Corrupted entries dropped from the queue
    pub discarded: usize,
}

impl DrainReport {
    #[must_use]
    pub fn skipped(status: DrainStatus) -> Self {
        Self {
            status,
            batch_size: 0,
            succeeded: Vec::new(),
            failed: Vec::new(),
            discarded: 0,
        }
    }

    fn started(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::skipped(DrainStatus::Completed)
        }
    }

    /// Whether the batch changes the persisted queue
    #[must_use]
    pub fn has_removals(&self) -> bool {
        !self.succeeded.is_empty() || self.discarded > 0
    }
}

pub struct ArchiveQueue {
    store: Arc<dyn KvStore>,
    drain_permit: Mutex<()>,
}

impl ArchiveQueue {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            drain_permit: Mutex::new(()),
        }
    }

    /// Raw persisted entries; a non-array value counts as an empty queue
    async fn load_raw(&self) -> StoreResult<Vec<Value>> {
        match self.store.get(keys::ARCHIVE_QUEUE).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => {
                warn!("Archive queue is not an array, treating it as empty: {other}");
                Ok(Vec::new())
            }
        }
    }

    async fn save_raw(&self, entries: Vec<Value>) -> StoreResult<()> {
        self.store
            .set(keys::ARCHIVE_QUEUE, Value::Array(entries))
            .await
    }

    /// Append `url` unless a task for it is already queued
    ///
    /// Returns `true` when a task was added. Empty URLs are ignored.
    pub async fn enqueue_if_absent(&self, url: &str) -> StoreResult<bool> {
        if url.is_empty() {
            return Ok(false);
        }

        let mut entries = self.load_raw().await?;
        if entries.iter().any(|e| task::raw_url(e) == Some(url)) {
            debug!("Already queued: {url}");
            return Ok(false);
        }

        entries.push(serde_json::to_value(QueueTask::new(url, now_millis()))?);
        self.save_raw(entries).await?;
        debug!("Queued {url}");
        Ok(true)
    }

    /// Valid tasks currently persisted, in queue order
    pub async fn snapshot(&self) -> StoreResult<Vec<QueueTask>> {
        Ok(self
            .load_raw()
            .await?
            .iter()
            .filter_map(QueueTask::from_value)
            .collect())
    }

    /// Number of persisted entries, corrupted ones included
    pub async fn len(&self) -> StoreResult<usize> {
        Ok(self.load_raw().await?.len())
    }

    pub async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Whether a drain currently holds the permit
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.drain_permit.try_lock().is_err()
    }

    /// Attempt every queued task once, strictly one request at a time
    ///
    /// Successful URLs get a cooldown record and are removed from the
    /// persisted queue; failed ones stay for the next drain. Returns
    /// immediately with [`DrainStatus::AlreadyRunning`] if another drain is in
    /// progress.
    ///
    /// # Errors
    ///
    /// Propagates store failures. The permit is released and the
    /// reconciliation step still runs for whatever succeeded before the
    /// failure.
    pub async fn drain(
        &self,
        submitter: &dyn Submitter,
        ledger: &CooldownLedger,
    ) -> StoreResult<DrainReport> {
        let Ok(_permit) = self.drain_permit.try_lock() else {
            debug!("Drain already in progress, skipping");
            return Ok(DrainReport::skipped(DrainStatus::AlreadyRunning));
        };

        let batch = self.load_raw().await?;
        if batch.is_empty() {
            return Ok(DrainReport::skipped(DrainStatus::Empty));
        }

        info!("Starting batch processing of {} items.", batch.len());
        let mut report = DrainReport::started(batch.len());

        let processed = Self::process_batch(&batch, submitter, ledger, &mut report).await;
        let reconciled = if report.has_removals() {
            self.reconcile(&report).await
        } else {
            Ok(())
        };

        info!(
            "Batch complete. {} OK, {} failed, {} discarded.",
            report.succeeded.len(),
            report.failed.len(),
            report.discarded
        );

        processed?;
        reconciled?;
        Ok(report)
    }

    async fn process_batch(
        batch: &[Value],
        submitter: &dyn Submitter,
        ledger: &CooldownLedger,
        report: &mut DrainReport,
    ) -> StoreResult<()> {
        let mut attempted = HashSet::new();

        for entry in batch {
            let Some(task) = QueueTask::from_value(entry) else {
                warn!("Discarding corrupted queue entry: {entry}");
                report.discarded += 1;
                continue;
            };

            if !attempted.insert(task.url.clone()) {
                continue;
            }

            let outcome = submitter.submit(&task.url).await;
            if outcome.is_success() {
                report.succeeded.push(task.url.clone());
                ledger.record_success(&task.url, now_millis()).await?;
            } else {
                debug!("Keeping {} for retry: {outcome}", task.url);
                report.failed.push(task.url);
            }
        }

        Ok(())
    }

    /// Remove this batch's successes and all corrupted entries from a fresh read
    async fn reconcile(&self, report: &DrainReport) -> StoreResult<()> {
        let succeeded: HashSet<&str> = report.succeeded.iter().map(String::as_str).collect();
        let current = self.load_raw().await?;
        let before = current.len();

        let remaining: Vec<Value> = current
            .into_iter()
            .filter(|entry| match QueueTask::from_value(entry) {
                Some(task) => !succeeded.contains(task.url.as_str()),
                None => false,
            })
            .collect();

        if remaining.len() != before {
            debug!(
                "Reconciled queue: {} -> {} entries",
                before,
                remaining.len()
            );
            self.save_raw(remaining).await?;
        }
        Ok(())
    }
}
