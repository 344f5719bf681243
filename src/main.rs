// Category CLI: Wayback Auto-Archiver
//
// Headless host for the auto-archiver. Reads one command per line from stdin:
// a URL navigates to that page, `:toggle`, `:save`, `:drain`, `:status`,
// `:click <selector>` and `:quit` drive the archiver directly.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use kodegen_tools_autoarchive::{
    Archiver, ArchiverConfig, ClickEvent, Collaborators, InMemoryDom, JsonFileStore, LogNotifier,
    NavigationSignal,
};

const STORE_ENV: &str = "AUTOARCHIVE_STORE";
const ENDPOINT_ENV: &str = "AUTOARCHIVE_ENDPOINT";
const DEFAULT_STORE_PATH: &str = "autoarchive.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut builder = ArchiverConfig::builder();
    if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
        builder = builder.archive_endpoint(endpoint);
    }
    let config = builder.build().context("Invalid archiver configuration")?;

    let store_path = std::env::var(STORE_ENV).unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
    let store = Arc::new(
        JsonFileStore::open(&store_path)
            .await
            .with_context(|| format!("Failed to open store at {store_path}"))?,
    );

    let dom = Arc::new(InMemoryDom::new("about:blank", ""));
    let parts = Collaborators::wayback(&config, store, dom.clone(), Arc::new(LogNotifier));
    let archiver = Archiver::start(config, parts).await?;

    let (tx, rx) = mpsc::channel(64);
    let monitor = tokio::spawn(Arc::clone(&archiver).run(rx));

    let http = reqwest::Client::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => {}
            (":quit", _) => break,
            (":toggle", _) => {
                if let Err(e) = archiver.toggle_enabled().await {
                    log::error!("Toggle failed: {e}");
                }
            }
            (":save", _) => {
                if archiver.save_now().await.is_none() {
                    log::info!("Save already in progress");
                }
            }
            (":drain", _) => {
                let report = archiver.drain().await;
                log::info!(
                    "Drain {:?}: {} OK, {} failed",
                    report.status,
                    report.succeeded.len(),
                    report.failed.len()
                );
            }
            (":status", _) => match archiver.status().await {
                Ok(status) => log::info!("{status:?}"),
                Err(e) => log::error!("Status unavailable: {e}"),
            },
            (":click", selector) if !selector.trim().is_empty() => {
                tx.send(NavigationSignal::Interaction(ClickEvent::new(selector.trim())))
                    .await?;
            }
            (cmd, _) if cmd.starts_with(':') => log::warn!("Unknown command: {line}"),
            _ => {
                let html = fetch_page(&http, line).await;
                dom.navigate(line, html);
                tx.send(NavigationSignal::HistoryChanged).await?;
            }
        }
    }

    drop(tx);
    monitor.await?;
    Ok(())
}

/// Page HTML, or an empty document when the fetch fails
async fn fetch_page(http: &reqwest::Client, url: &str) -> String {
    let body = match http.get(url).send().await {
        Ok(response) => response.text().await,
        Err(e) => Err(e),
    };
    body.unwrap_or_else(|e| {
        log::warn!("Could not fetch {url}: {e}");
        String::new()
    })
}
