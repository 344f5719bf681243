//! Queue task representation
//!
//! The queue is persisted as a JSON array. Entries written by older or buggy
//! clients may be missing `url`, carry a non-string, or not be objects at all,
//! so the raw `Value` is kept and validated per entry instead of failing the
//! whole array on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One pending submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTask {
    pub url: String,
    /// Epoch millis at enqueue time
    #[serde(rename = "addedAt", default)]
    pub added_at: i64,
}

impl QueueTask {
    #[must_use]
    pub fn new(url: impl Into<String>, added_at: i64) -> Self {
        Self {
            url: url.into(),
            added_at,
        }
    }

    /// Validate a raw queue entry
    ///
    /// `None` for anything whose `url` is not a non-empty string.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let url = value.get("url")?.as_str().filter(|u| !u.is_empty())?;
        let added_at = value.get("addedAt").and_then(Value::as_i64).unwrap_or(0);
        Some(Self::new(url, added_at))
    }
}

/// `url` of a raw entry if it is a string, valid or not
pub(crate) fn raw_url(value: &Value) -> Option<&str> {
    value.get("url").and_then(Value::as_str)
}
