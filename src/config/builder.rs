//! Fluent builder for `ArchiverConfig`
//!
//! Every field starts at its default; `build()` validates the endpoint and
//! the timings and compiles the site profile once so the hot paths never
//! parse a selector or a regex.

use anyhow::{Result, anyhow};
use std::sync::Arc;

use super::site::{SiteProfile, SiteRules};
use super::types::{ArchiverConfig, SubmitMethod};
use crate::utils::{MAX_TIMING_SECS, is_valid_url};

pub struct ArchiverConfigBuilder {
    pub(crate) site: SiteProfile,
    pub(crate) archive_endpoint: String,
    pub(crate) submit_method: SubmitMethod,
    pub(crate) submit_timeout_secs: u64,
    pub(crate) manual_save_method: SubmitMethod,
    pub(crate) manual_save_timeout_secs: u64,
    pub(crate) cooldown_hours: u64,
    pub(crate) debounce_ms: u64,
    pub(crate) reveal_settle_ms: u64,
    pub(crate) container_wait_ms: u64,
    pub(crate) drain_interval_secs: u64,
    pub(crate) save_rearm_ms: u64,
    pub(crate) enabled_default: bool,
}

impl Default for ArchiverConfigBuilder {
    fn default() -> Self {
        let defaults = ArchiverConfig::default();
        Self {
            site: defaults.site,
            archive_endpoint: defaults.archive_endpoint,
            submit_method: defaults.submit_method,
            submit_timeout_secs: defaults.submit_timeout_secs,
            manual_save_method: defaults.manual_save_method,
            manual_save_timeout_secs: defaults.manual_save_timeout_secs,
            cooldown_hours: defaults.cooldown_hours,
            debounce_ms: defaults.debounce_ms,
            reveal_settle_ms: defaults.reveal_settle_ms,
            container_wait_ms: defaults.container_wait_ms,
            drain_interval_secs: defaults.drain_interval_secs,
            save_rearm_ms: defaults.save_rearm_ms,
            enabled_default: defaults.enabled_default,
        }
    }
}

impl ArchiverConfigBuilder {
    /// Validate and assemble the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an http(s) URL, if a timeout or
    /// interval is zero, if any timing exceeds `MAX_TIMING_SECS`, or if the
    /// site profile does not compile.
    pub fn build(self) -> Result<ArchiverConfig> {
        let endpoint = self.archive_endpoint.trim_end_matches('/').to_string();
        if !is_valid_url(&endpoint) {
            return Err(anyhow!(
                "archive_endpoint '{}' is not an http(s) URL",
                self.archive_endpoint
            ));
        }

        if self.submit_timeout_secs == 0 || self.manual_save_timeout_secs == 0 {
            return Err(anyhow!("request timeouts must be at least one second"));
        }

        if self.drain_interval_secs == 0 {
            return Err(anyhow!("drain_interval_secs must be at least one second"));
        }

        let max_ms = MAX_TIMING_SECS * 1_000;
        let timings = [
            ("submit_timeout_secs", self.submit_timeout_secs, MAX_TIMING_SECS),
            ("manual_save_timeout_secs", self.manual_save_timeout_secs, MAX_TIMING_SECS),
            ("drain_interval_secs", self.drain_interval_secs, MAX_TIMING_SECS),
            ("debounce_ms", self.debounce_ms, max_ms),
            ("reveal_settle_ms", self.reveal_settle_ms, max_ms),
            ("container_wait_ms", self.container_wait_ms, max_ms),
            ("save_rearm_ms", self.save_rearm_ms, max_ms),
        ];
        if let Some((name, value, max)) = timings.iter().find(|(_, value, max)| value > max) {
            return Err(anyhow!("{name} = {value} exceeds the maximum of {max}"));
        }

        let rules = SiteRules::compile(&self.site)?;

        Ok(ArchiverConfig {
            site: self.site,
            rules: Arc::new(rules),
            archive_endpoint: endpoint,
            submit_method: self.submit_method,
            submit_timeout_secs: self.submit_timeout_secs,
            manual_save_method: self.manual_save_method,
            manual_save_timeout_secs: self.manual_save_timeout_secs,
            cooldown_hours: self.cooldown_hours,
            debounce_ms: self.debounce_ms,
            reveal_settle_ms: self.reveal_settle_ms,
            container_wait_ms: self.container_wait_ms,
            drain_interval_secs: self.drain_interval_secs,
            save_rearm_ms: self.save_rearm_ms,
            enabled_default: self.enabled_default,
        })
    }
}
