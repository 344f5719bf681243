//! Getter methods for `ArchiverConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from an `ArchiverConfig` instance.

use std::sync::Arc;
use std::time::Duration;

use super::site::{SiteProfile, SiteRules};
use super::types::{ArchiverConfig, SubmitMethod};

impl ArchiverConfig {
    #[must_use]
    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    /// Compiled selectors and patterns of the site profile
    #[must_use]
    pub fn rules(&self) -> Arc<SiteRules> {
        Arc::clone(&self.rules)
    }

    #[must_use]
    pub fn archive_endpoint(&self) -> &str {
        &self.archive_endpoint
    }

    #[must_use]
    pub fn submit_method(&self) -> SubmitMethod {
        self.submit_method
    }

    #[must_use]
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    #[must_use]
    pub fn manual_save_method(&self) -> SubmitMethod {
        self.manual_save_method
    }

    #[must_use]
    pub fn manual_save_timeout(&self) -> Duration {
        Duration::from_secs(self.manual_save_timeout_secs)
    }

    #[must_use]
    pub fn cooldown_window(&self) -> Duration {
        Duration::from_secs(self.cooldown_hours.saturating_mul(3_600))
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn reveal_settle(&self) -> Duration {
        Duration::from_millis(self.reveal_settle_ms)
    }

    #[must_use]
    pub fn container_wait(&self) -> Duration {
        Duration::from_millis(self.container_wait_ms)
    }

    #[must_use]
    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain_interval_secs)
    }

    #[must_use]
    pub fn save_rearm(&self) -> Duration {
        Duration::from_millis(self.save_rearm_ms)
    }

    #[must_use]
    pub fn enabled_default(&self) -> bool {
        self.enabled_default
    }
}
