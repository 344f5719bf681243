//! Cooldown ledger
//!
//! One `ts_<url>` record per successfully archived URL holding the epoch
//! millisecond of the last confirmed submission. Records never expire: the
//! key space is bounded by the distinct items ever visited.

use log::warn;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StoreResult;
use crate::store::{KvStore, KvStoreExt, keys};
use crate::utils::now_millis;

#[derive(Clone)]
pub struct CooldownLedger {
    store: Arc<dyn KvStore>,
}

impl CooldownLedger {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Epoch millis of the last successful submission, 0 when never submitted
    ///
    /// Float timestamps are truncated. Anything that is not a number counts
    /// as never submitted.
    pub async fn last_submitted(&self, url: &str) -> StoreResult<i64> {
        let key = keys::cooldown_key(url);
        Ok(match self.store.get(&key).await? {
            None | Some(Value::Null) => 0,
            Some(value) => millis_of(&value).unwrap_or_else(|| {
                warn!("Ignoring malformed cooldown record {key}: {value}");
                0
            }),
        })
    }

    /// Whether `url` was archived less than `window` ago
    pub async fn is_on_cooldown(&self, url: &str, window: Duration) -> StoreResult<bool> {
        self.is_on_cooldown_at(url, window, now_millis()).await
    }

    /// [`is_on_cooldown`](Self::is_on_cooldown) evaluated at a fixed `now`
    pub async fn is_on_cooldown_at(
        &self,
        url: &str,
        window: Duration,
        now: i64,
    ) -> StoreResult<bool> {
        let last = self.last_submitted(url).await?;
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        Ok(now.saturating_sub(last) < window_ms)
    }

    /// Record a confirmed submission, overwriting any earlier record
    pub async fn record_success(&self, url: &str, now: i64) -> StoreResult<()> {
        self.store.put(&keys::cooldown_key(url), &now).await
    }
}

#[allow(clippy::cast_possible_truncation)]
fn millis_of(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
    })
}
