//! User-facing notifications
//!
//! Transient, non-blocking status messages (toasts in a browser host, log
//! lines in the headless driver). The archiver never waits on or reads back
//! from a notifier.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::utils::{LOG_TARGET, NOTIFY_DEFAULT_MS};

/// Fire-and-forget message sink
pub trait Notifier: Send + Sync {
    /// Show `message` for roughly `duration`
    fn show(&self, message: &str, duration: Duration);

    /// Show `message` for the default duration
    fn notify(&self, message: &str) {
        self.show(message, Duration::from_millis(NOTIFY_DEFAULT_MS));
    }
}

/// Notifier that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    #[inline(always)]
    fn show(&self, _message: &str, _duration: Duration) {}
}

/// Notifier that writes every message to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, message: &str, _duration: Duration) {
        log::info!(target: LOG_TARGET, "{message}");
    }
}

/// A message delivered through [`ChannelNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
}

/// Notifier that forwards messages over an unbounded channel
///
/// Sending never blocks; messages are dropped silently once the receiver is
/// gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn show(&self, message: &str, duration: Duration) {
        let _ = self.tx.send(Notification {
            message: message.to_string(),
            duration,
        });
    }
}
