//! Core configuration types for the archiver
//!
//! This module contains the main `ArchiverConfig` struct that defines the
//! timing, endpoint and site parameters of an archiving session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::site::{SiteProfile, SiteRules};
use crate::utils::{
    DEFAULT_ARCHIVE_ENDPOINT, DEFAULT_CONTAINER_WAIT_MS, DEFAULT_COOLDOWN_HOURS,
    DEFAULT_DEBOUNCE_MS, DEFAULT_DRAIN_INTERVAL_SECS, DEFAULT_MANUAL_SAVE_TIMEOUT_SECS,
    DEFAULT_REVEAL_SETTLE_MS, DEFAULT_SAVE_REARM_MS, DEFAULT_SUBMIT_TIMEOUT_SECS,
};

/// HTTP method used for save requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmitMethod {
    /// Plain GET without a body
    #[default]
    Get,
    /// POST with an empty form-encoded body
    Post,
}

/// Main configuration struct for an archiving session
#[derive(Debug, Clone, Serialize)]
pub struct ArchiverConfig {
    pub(crate) site: SiteProfile,

    /// Compiled form of `site`, built once by the builder
    #[serde(skip)]
    pub(crate) rules: Arc<SiteRules>,

    /// Base URL of the save endpoint; targets are appended as one path segment
    pub(crate) archive_endpoint: String,
    pub(crate) submit_method: SubmitMethod,
    pub(crate) submit_timeout_secs: u64,
    pub(crate) manual_save_method: SubmitMethod,
    pub(crate) manual_save_timeout_secs: u64,

    /// Minimum age of a cooldown record before the item may be resubmitted
    pub(crate) cooldown_hours: u64,

    pub(crate) debounce_ms: u64,
    pub(crate) reveal_settle_ms: u64,
    pub(crate) container_wait_ms: u64,
    pub(crate) drain_interval_secs: u64,
    pub(crate) save_rearm_ms: u64,

    /// Value of the enabled flag when the store holds none
    pub(crate) enabled_default: bool,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        let site = SiteProfile::default();
        let rules = SiteRules::compile(&site).expect("BUG: default site profile is invalid");
        Self {
            site,
            rules: Arc::new(rules),
            archive_endpoint: DEFAULT_ARCHIVE_ENDPOINT.to_string(),
            submit_method: SubmitMethod::Get,
            submit_timeout_secs: DEFAULT_SUBMIT_TIMEOUT_SECS,
            manual_save_method: SubmitMethod::Post,
            manual_save_timeout_secs: DEFAULT_MANUAL_SAVE_TIMEOUT_SECS,
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            reveal_settle_ms: DEFAULT_REVEAL_SETTLE_MS,
            container_wait_ms: DEFAULT_CONTAINER_WAIT_MS,
            drain_interval_secs: DEFAULT_DRAIN_INTERVAL_SECS,
            save_rearm_ms: DEFAULT_SAVE_REARM_MS,
            enabled_default: true,
        }
    }
}

impl ArchiverConfig {
    /// Start a builder pre-populated with the defaults
    #[must_use]
    pub fn builder() -> super::builder::ArchiverConfigBuilder {
        super::builder::ArchiverConfigBuilder::default()
    }
}
