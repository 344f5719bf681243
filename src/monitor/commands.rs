//! User commands: enable toggle, manual save, status

use log::{debug, info};

use super::archiver::Archiver;
use super::context::MonitorState;
use crate::error::ArchiveResult;
use crate::store::{KvStoreExt, keys};
use crate::submit::SubmitOutcome;

/// Point-in-time view of the archiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiverStatus {
    pub enabled: bool,
    pub state: MonitorState,
    pub queued: usize,
    pub draining: bool,
    pub last_seen: String,
}

/// Notification text for a manual save result
#[must_use]
pub fn save_label(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Archived { .. } => "✔ Saved!".to_string(),
        SubmitOutcome::Overloaded { status } | SubmitOutcome::Rejected { status } => {
            format!("⚠ {status}")
        }
        SubmitOutcome::TimedOut => "⏲ Timeout".to_string(),
        SubmitOutcome::Transport(_) => "⚠ Error".to_string(),
    }
}

impl Archiver {
    /// Flip the enabled flag and persist it
    ///
    /// # Errors
    ///
    /// Returns an error if the flag cannot be read or written; the cached
    /// flag is left at the persisted value in that case.
    pub async fn toggle_enabled(&self) -> ArchiveResult<bool> {
        let enabled = !self.refresh_enabled().await?;
        self.store.put(keys::GLOBAL_ENABLED, &enabled).await?;
        self.ctx.set_enabled(enabled);

        let label = if enabled { "ENABLED" } else { "DISABLED" };
        info!("Toggled via menu. Status: {label}");
        self.notifier
            .notify(&format!("Wayback auto-archiver is now {label}."));
        Ok(enabled)
    }

    /// Submit the current location right away, bypassing queue and cooldown
    ///
    /// `None` when a previous save is still running or re-arming.
    pub async fn save_now(&self) -> Option<SubmitOutcome> {
        let Some(_claim) = self.ctx.try_claim_save(self.config.save_rearm()) else {
            debug!("Manual save already in progress");
            return None;
        };

        let location = self.dom.location();
        info!("Manual save requested for {location}");
        let outcome = self.manual_submitter.submit(&location).await;
        self.notifier.notify(&save_label(&outcome));
        Some(outcome)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn status(&self) -> ArchiveResult<ArchiverStatus> {
        Ok(ArchiverStatus {
            enabled: self.refresh_enabled().await?,
            state: self.ctx.state(),
            queued: self.queue.len().await?,
            draining: self.queue.is_draining(),
            last_seen: self
                .store
                .get_lenient(keys::LAST_PROCESSED_URL, String::new())
                .await?,
        })
    }
}
