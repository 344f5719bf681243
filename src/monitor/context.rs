//! Process-wide archiver state
//!
//! Holds the in-memory state every phase consults: the last-read copy of the
//! enabled switch, the evaluation permit that serializes page evaluations,
//! the current phase, and the busy flag of the manual save command. The
//! enabled switch is re-read from the store by every phase; the permits are
//! scoped guards released on every exit path.

use parking_lot::Mutex as SyncMutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::StoreResult;
use crate::store::{KvStore, KvStoreExt, keys};

/// Phase of the navigation monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Idle,
    /// Resolving the item identity and checking Last-Seen and cooldown
    Evaluating,
    /// Waiting for the item container and extracting content URLs
    Discovering,
    /// Appending candidates to the archive queue
    Queueing,
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Evaluating => "evaluating",
            Self::Discovering => "discovering",
            Self::Queueing => "queueing",
        };
        f.write_str(label)
    }
}

pub struct ArchiverContext {
    enabled: AtomicBool,
    eval_permit: Mutex<()>,
    state: SyncMutex<MonitorState>,
    save_busy: Arc<AtomicBool>,
}

impl ArchiverContext {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            eval_permit: Mutex::new(()),
            state: SyncMutex::new(MonitorState::Idle),
            save_busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Read the persisted enabled flag, falling back to `default`
    pub async fn load(store: &dyn KvStore, default: bool) -> StoreResult<Self> {
        let enabled = store.get_lenient(keys::GLOBAL_ENABLED, default).await?;
        Ok(Self::new(enabled))
    }

    /// Enabled flag as of the last store read
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        *self.state.lock()
    }

    /// Whether an evaluation currently holds the permit
    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.eval_permit.try_lock().is_err()
    }

    /// Wait for the evaluation permit and enter [`MonitorState::Evaluating`]
    ///
    /// Evaluations queue up behind each other instead of being dropped.
    pub async fn begin_evaluation(&self) -> EvaluationGuard<'_> {
        let permit = self.eval_permit.lock().await;
        *self.state.lock() = MonitorState::Evaluating;
        EvaluationGuard {
            _permit: permit,
            state: &self.state,
        }
    }

    /// Claim the manual save command
    ///
    /// `None` while a previous save is running or inside its re-arm delay.
    #[must_use]
    pub fn try_claim_save(&self, rearm: Duration) -> Option<SaveGuard> {
        if self.save_busy.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(SaveGuard {
            flag: Arc::clone(&self.save_busy),
            rearm,
        })
    }

    #[must_use]
    pub fn is_save_busy(&self) -> bool {
        self.save_busy.load(Ordering::SeqCst)
    }
}

/// Holds the evaluation permit; resets the phase to idle on drop
pub struct EvaluationGuard<'a> {
    _permit: MutexGuard<'a, ()>,
    state: &'a SyncMutex<MonitorState>,
}

impl EvaluationGuard<'_> {
    pub fn advance(&self, next: MonitorState) {
        *self.state.lock() = next;
    }
}

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = MonitorState::Idle;
    }
}

/// Claim on the manual save command
///
/// Dropping it re-arms the command after the configured delay.
pub struct SaveGuard {
    flag: Arc<AtomicBool>,
    rearm: Duration,
}

impl Drop for SaveGuard {
    fn drop(&mut self) {
        let flag = Arc::clone(&self.flag);
        if self.rearm.is_zero() {
            flag.store(false, Ordering::SeqCst);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let rearm = self.rearm;
                handle.spawn(async move {
                    tokio::time::sleep(rearm).await;
                    flag.store(false, Ordering::SeqCst);
                });
            }
            Err(_) => flag.store(false, Ordering::SeqCst),
        }
    }
}
