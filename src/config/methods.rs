//! Setter methods of the configuration builder

use super::builder::ArchiverConfigBuilder;
use super::site::SiteProfile;
use super::types::SubmitMethod;

impl ArchiverConfigBuilder {
    /// Replace the site profile (hosts and selector allowlists)
    #[must_use]
    pub fn site(mut self, site: SiteProfile) -> Self {
        self.site = site;
        self
    }

    /// Set the save endpoint, e.g. `https://web.archive.org/save`
    #[must_use]
    pub fn archive_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.archive_endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn submit_method(mut self, method: SubmitMethod) -> Self {
        self.submit_method = method;
        self
    }

    #[must_use]
    pub fn submit_timeout_secs(mut self, secs: u64) -> Self {
        self.submit_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn manual_save_method(mut self, method: SubmitMethod) -> Self {
        self.manual_save_method = method;
        self
    }

    #[must_use]
    pub fn manual_save_timeout_secs(mut self, secs: u64) -> Self {
        self.manual_save_timeout_secs = secs;
        self
    }

    /// Set the cooldown window in hours
    ///
    /// Zero disables the cooldown: every new navigation to an item queues it
    /// again.
    #[must_use]
    pub fn cooldown_hours(mut self, hours: u64) -> Self {
        self.cooldown_hours = hours;
        self
    }

    #[must_use]
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    #[must_use]
    pub fn reveal_settle_ms(mut self, ms: u64) -> Self {
        self.reveal_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn container_wait_ms(mut self, ms: u64) -> Self {
        self.container_wait_ms = ms;
        self
    }

    #[must_use]
    pub fn drain_interval_secs(mut self, secs: u64) -> Self {
        self.drain_interval_secs = secs;
        self
    }

    #[must_use]
    pub fn save_rearm_ms(mut self, ms: u64) -> Self {
        self.save_rearm_ms = ms;
        self
    }

    /// Value of the enabled flag used when the store has none yet
    #[must_use]
    pub fn enabled_default(mut self, enabled: bool) -> Self {
        self.enabled_default = enabled;
        self
    }
}
