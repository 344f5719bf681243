//! Signal loop of the navigation monitor

use log::{debug, info};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use super::archiver::Archiver;
use super::debounce::Debouncer;
use crate::dom::ClickEvent;

/// Events the host page forwards to the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationSignal {
    /// `pushState` or `replaceState`
    HistoryChanged,
    /// Back/forward navigation
    PopState,
    /// A click anywhere on the page
    Interaction(ClickEvent),
}

impl Archiver {
    /// Consume navigation signals until the sender side is dropped
    ///
    /// Navigation signals are debounced into page evaluations, clicks are
    /// rescanned immediately, and the queue is drained on a fixed interval.
    /// One evaluation is scheduled at start for the initial page load.
    /// Evaluations, rescans and drains run as spawned tasks so a slow save
    /// request never delays signal handling.
    pub async fn run(self: Arc<Self>, mut signals: mpsc::Receiver<NavigationSignal>) {
        let mut debouncer = Debouncer::new(self.config.debounce());
        let period = self.config.drain_interval();
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut drain_timer = tokio::time::interval_at(start, period);
        drain_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debouncer.trigger();
        info!("Navigation monitor running");

        loop {
            tokio::select! {
                signal = signals.recv() => match signal {
                    Some(NavigationSignal::HistoryChanged | NavigationSignal::PopState) => {
                        debouncer.trigger();
                    }
                    Some(NavigationSignal::Interaction(click)) => {
                        let this = Arc::clone(&self);
                        tokio::spawn(async move {
                            this.handle_interaction(&click).await;
                        });
                    }
                    None => break,
                },
                () = debouncer.expired() => {
                    let this = Arc::clone(&self);
                    tokio::spawn(async move {
                        let change = this.handle_page_change().await;
                        debug!("Page evaluation finished: {change:?}");
                    });
                }
                _ = drain_timer.tick() => {
                    let this = Arc::clone(&self);
                    tokio::spawn(async move {
                        let report = this.drain().await;
                        debug!("Periodic drain finished: {:?}", report.status);
                    });
                }
            }
        }

        info!("Navigation signal source closed, monitor stopped");
    }
}
