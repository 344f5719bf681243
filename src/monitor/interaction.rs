//! Rescan after a content-reveal click
//!
//! Hidden media only lands in the DOM once the user confirms a reveal
//! button. The container is located at click time, the page is given time to
//! settle, and the same container is read again from a fresh snapshot.

use log::{debug, error, info};
use scraper::{Html, Selector};

use super::archiver::Archiver;
use crate::discovery::{closest, match_ordinal, nth_match_html};
use crate::dom::ClickEvent;
use crate::error::{ArchiveError, ArchiveResult};

impl Archiver {
    /// Queue content revealed by `click`
    ///
    /// Returns the discovered URLs, empty when the click was not on a reveal
    /// button inside an item container. Never touches Last-Seen or the
    /// cooldown gate and never queues the item identity.
    pub async fn handle_interaction(&self, click: &ClickEvent) -> Vec<String> {
        match self.refresh_enabled().await {
            Ok(true) => {}
            Ok(false) => return Vec::new(),
            Err(e) => {
                error!("Could not read the enabled flag: {e}");
                return Vec::new();
            }
        }

        let ordinal = match self.locate_revealed_container(click) {
            Ok(Some(ordinal)) => ordinal,
            Ok(None) => return Vec::new(),
            Err(e) => {
                debug!("Ignoring click: {e}");
                return Vec::new();
            }
        };

        info!("Sensitive content reveal clicked. Waiting for content...");
        tokio::time::sleep(self.config.reveal_settle()).await;

        let Some(container) =
            nth_match_html(&self.dom.snapshot(), &self.rules.container, ordinal)
        else {
            debug!("Item container disappeared after reveal");
            return Vec::new();
        };

        let urls = self.discoverer.extract(&container);
        if urls.is_empty() {
            return urls;
        }

        info!("Found new content post-click: {urls:?}");
        match self.enqueue_all(&urls).await {
            Ok(_) => {
                self.drain().await;
            }
            Err(e) => error!("Error queueing revealed content: {e}"),
        }
        urls
    }

    /// Ordinal of the item container holding the clicked reveal button
    fn locate_revealed_container(&self, click: &ClickEvent) -> ArchiveResult<Option<usize>> {
        let target = Selector::parse(&click.target)
            .map_err(|_| ArchiveError::ClickTarget(click.target.clone()))?;

        let document = Html::parse_document(&self.dom.snapshot());
        let Some(clicked) = document.select(&target).next() else {
            return Ok(None);
        };
        let Some(button) = closest(clicked, &self.rules.reveal_button) else {
            return Ok(None);
        };
        let Some(container) = closest(button, &self.rules.container) else {
            return Ok(None);
        };

        Ok(match_ordinal(&document, &self.rules.container, container.id()))
    }
}
