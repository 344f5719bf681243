//! Wayback Machine save client

use futures::future::BoxFuture;
use std::time::Duration;

use super::{SubmitOutcome, Submitter};
use crate::config::{ArchiverConfig, SubmitMethod};
use crate::utils::save_url;

/// Issues one save request per call against a save endpoint
#[derive(Debug, Clone)]
pub struct WaybackClient {
    http: reqwest::Client,
    endpoint: String,
    method: SubmitMethod,
    timeout: Duration,
}

impl WaybackClient {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, method: SubmitMethod, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            method,
            timeout,
        }
    }

    /// Client used by the queue drain
    #[must_use]
    pub fn for_queue(config: &ArchiverConfig) -> Self {
        Self::new(
            config.archive_endpoint(),
            config.submit_method(),
            config.submit_timeout(),
        )
    }

    /// Client used by the manual save command
    #[must_use]
    pub fn for_manual_save(config: &ArchiverConfig) -> Self {
        Self::new(
            config.archive_endpoint(),
            config.manual_save_method(),
            config.manual_save_timeout(),
        )
    }

    async fn save(&self, target: &str) -> SubmitOutcome {
        let url = save_url(&self.endpoint, target);

        let request = match self.method {
            SubmitMethod::Get => self.http.get(url.as_str()),
            SubmitMethod::Post => self
                .http
                .post(url.as_str())
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(""),
        };

        let outcome = match request.timeout(self.timeout).send().await {
            Ok(response) => SubmitOutcome::from_status(response.status().as_u16()),
            Err(e) if e.is_timeout() => SubmitOutcome::TimedOut,
            Err(e) => SubmitOutcome::Transport(e.to_string()),
        };

        if outcome.is_success() {
            log::info!("Archived {target}: {outcome}");
        } else {
            log::warn!("Save request for {target} failed: {outcome}");
        }
        outcome
    }
}

impl Submitter for WaybackClient {
    fn submit<'a>(&'a self, url: &'a str) -> BoxFuture<'a, SubmitOutcome> {
        Box::pin(self.save(url))
    }
}
