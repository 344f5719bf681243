//! Shared configuration constants for the auto-archiver
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Wayback Machine "save page now" endpoint
///
/// Targets are appended as a single percent-encoded path segment:
/// `https://web.archive.org/save/https%3A%2F%2Fexample.com%2F`
pub const DEFAULT_ARCHIVE_ENDPOINT: &str = "https://web.archive.org/save";

/// Cooldown window: 24 hours
///
/// A successfully archived item is not resubmitted until this much time has
/// passed. The archive keeps its own snapshots, so a daily capture is plenty.
pub const DEFAULT_COOLDOWN_HOURS: u64 = 24;

/// Debounce window for navigation signals: 500 ms
///
/// Single-page apps fire several `pushState`/`replaceState` calls per logical
/// navigation. Anything arriving inside this window collapses into one
/// evaluation.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Settle delay after a content-reveal click: 1.5 seconds
pub const DEFAULT_REVEAL_SETTLE_MS: u64 = 1_500;

/// Maximum wait for the item container to render: 5 seconds
pub const DEFAULT_CONTAINER_WAIT_MS: u64 = 5_000;

/// Interval of the background queue drain: 60 seconds
pub const DEFAULT_DRAIN_INTERVAL_SECS: u64 = 60;

/// Timeout for a queued save request: 60 seconds
///
/// The save endpoint routinely takes 20-40 seconds to answer while it
/// captures the page.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;

/// Timeout for a manual "save now" request: 30 seconds
pub const DEFAULT_MANUAL_SAVE_TIMEOUT_SECS: u64 = 30;

/// Re-arm delay of the manual save command after it finishes: 3 seconds
pub const DEFAULT_SAVE_REARM_MS: u64 = 3_000;

/// Upper bound for every configured delay, timeout and interval: 7 days
pub const MAX_TIMING_SECS: u64 = 7 * 24 * 3_600;

/// How long an ordinary notification stays visible: 3.5 seconds
pub const NOTIFY_DEFAULT_MS: u64 = 3_500;

/// How long a batch summary notification stays visible: 5 seconds
pub const NOTIFY_SUMMARY_MS: u64 = 5_000;

/// Log target shared by every module of the archiver
pub const LOG_TARGET: &str = "autoarchive";
