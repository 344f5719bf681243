//! Storage keys
//!
//! These names are the persisted format; changing one orphans existing data.

/// Enabled flag (bool)
pub const GLOBAL_ENABLED: &str = "_enabled";

/// Archive queue (array of `{url, addedAt}`)
pub const ARCHIVE_QUEUE: &str = "_archive_queue";

/// Last evaluated canonical identity (string, empty when none)
pub const LAST_PROCESSED_URL: &str = "_last_processed_url";

/// Prefix of per-URL cooldown records (epoch millis)
pub const COOLDOWN_PREFIX: &str = "ts_";

/// Cooldown record key for a URL
#[must_use]
pub fn cooldown_key(url: &str) -> String {
    format!("{COOLDOWN_PREFIX}{url}")
}
