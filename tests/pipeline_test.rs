//! End-to-end tests of the navigation pipeline with in-memory collaborators

use kodegen_tools_autoarchive::store::keys;
use kodegen_tools_autoarchive::utils::now_millis;
use kodegen_tools_autoarchive::{
    ClickEvent, DrainStatus, KvStore, KvStoreExt, MemoryStore, MonitorState, NavigationSignal,
    PageChange, SubmitOutcome,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

mod common;

use common::{Harness, fast_config, hidden_post_page, identity, listing_page, post_page};

const POST_URL: &str = "https://www.reddit.com/r/pics/comments/abc123/a_cat/";
const IMAGE: &str = "https://i.imgur.com/cat.jpg";
const SOURCE: &str = "https://example.org/source";

#[tokio::test]
async fn test_new_item_is_queued_and_archived() {
    let mut h = Harness::new(POST_URL, &post_page(IMAGE, &[SOURCE])).await;
    let start = now_millis();

    let change = h.archiver.handle_page_change().await;

    assert_eq!(
        change,
        PageChange::Queued {
            identity: identity("abc123"),
            candidates: vec![identity("abc123"), IMAGE.to_string(), SOURCE.to_string()],
            added: 3,
        }
    );
    assert_eq!(
        h.submitter.calls(),
        vec![identity("abc123"), IMAGE.to_string(), SOURCE.to_string()]
    );
    assert!(h.queued_urls().await.is_empty());
    for url in [identity("abc123").as_str(), IMAGE, SOURCE] {
        assert!(h.archiver.ledger().last_submitted(url).await.unwrap() >= start);
    }

    let messages = h.drain_notifications();
    assert!(messages.contains(&"Added to archive queue.".to_string()));
    assert!(messages.contains(&"Archive complete: 3 OK, 0 failed.".to_string()));
    assert_eq!(h.archiver.context().state(), MonitorState::Idle);
}

#[tokio::test]
async fn test_same_item_is_not_evaluated_twice() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.archiver.handle_page_change().await;

    h.dom
        .set_location("https://old.reddit.com/r/pics/comments/abc123/?sort=new");
    assert_eq!(
        h.archiver.handle_page_change().await,
        PageChange::Duplicate(identity("abc123"))
    );

    h.dom.set_location("https://redd.it/abc123");
    assert_eq!(
        h.archiver.handle_page_change().await,
        PageChange::Duplicate(identity("abc123"))
    );
    assert_eq!(h.submitter.call_count(&identity("abc123")), 1);
}

#[tokio::test]
async fn test_recently_archived_item_is_on_cooldown() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.archiver
        .ledger()
        .record_success(&identity("abc123"), now_millis() - 60_000)
        .await
        .unwrap();

    assert_eq!(
        h.archiver.handle_page_change().await,
        PageChange::OnCooldown(identity("abc123"))
    );
    assert!(h.submitter.calls().is_empty());
    assert!(h.queued_urls().await.is_empty());

    let last_seen: String = h
        .store
        .get_or(keys::LAST_PROCESSED_URL, String::new())
        .await
        .unwrap();
    assert_eq!(last_seen, identity("abc123"));
}

#[tokio::test]
async fn test_stale_cooldown_allows_resubmission() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.archiver
        .ledger()
        .record_success(&identity("abc123"), now_millis() - 25 * 3_600_000)
        .await
        .unwrap();

    assert!(matches!(
        h.archiver.handle_page_change().await,
        PageChange::Queued { .. }
    ));
}

#[tokio::test]
async fn test_leaving_an_item_clears_last_seen() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.archiver.handle_page_change().await;

    h.dom.navigate("https://www.reddit.com/r/pics/", listing_page());
    assert_eq!(h.archiver.handle_page_change().await, PageChange::NotAnItem);
    assert_eq!(h.store.peek(keys::LAST_PROCESSED_URL), Some(json!("")));

    // Coming back is a new visit, but the item is now on cooldown.
    h.dom.navigate(POST_URL, post_page(IMAGE, &[]));
    assert_eq!(
        h.archiver.handle_page_change().await,
        PageChange::OnCooldown(identity("abc123"))
    );
}

#[tokio::test]
async fn test_failed_submission_stays_queued_without_cooldown() {
    let mut h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.submitter
        .script(&identity("abc123"), [SubmitOutcome::Overloaded { status: 503 }]);

    h.archiver.handle_page_change().await;

    assert_eq!(h.queued_urls().await, vec![identity("abc123")]);
    assert_eq!(
        h.archiver
            .ledger()
            .last_submitted(&identity("abc123"))
            .await
            .unwrap(),
        0
    );
    assert!(
        h.drain_notifications()
            .contains(&"Archive complete: 1 OK, 1 failed.".to_string())
    );

    let report = h.archiver.drain().await;
    assert_eq!(report.succeeded, vec![identity("abc123")]);
    assert!(h.queued_urls().await.is_empty());
}

#[tokio::test]
async fn test_container_that_never_renders_queues_identity_only() {
    let h = Harness::new(POST_URL, &listing_page()).await;

    let change = h.archiver.handle_page_change().await;

    assert!(matches!(
        change,
        PageChange::Queued { ref candidates, .. } if candidates == &vec![identity("abc123")]
    ));
}

#[tokio::test]
async fn test_late_rendered_container_is_discovered() {
    let h = Harness::new(POST_URL, &listing_page()).await;

    let dom = h.dom.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        dom.set_html(post_page(IMAGE, &[]));
    });

    let change = h.archiver.handle_page_change().await;
    assert!(matches!(
        change,
        PageChange::Queued { ref candidates, .. } if candidates.contains(&IMAGE.to_string())
    ));
    assert_eq!(h.dom.observer_count(), 0);
}

#[tokio::test]
async fn test_disabled_archiver_does_nothing() {
    let mut h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;

    assert!(!h.archiver.toggle_enabled().await.unwrap());
    assert_eq!(h.store.peek(keys::GLOBAL_ENABLED), Some(json!(false)));
    assert!(
        h.drain_notifications()
            .contains(&"Wayback auto-archiver is now DISABLED.".to_string())
    );

    assert_eq!(h.archiver.handle_page_change().await, PageChange::Disabled);
    h.archiver.queue().enqueue_if_absent(IMAGE).await.unwrap();
    assert_eq!(h.archiver.drain().await.status, DrainStatus::Disabled);
    assert!(h.submitter.calls().is_empty());

    assert!(h.archiver.toggle_enabled().await.unwrap());
    assert_eq!(h.archiver.drain().await.succeeded, vec![IMAGE.to_string()]);
}

#[tokio::test]
async fn test_enabled_flag_is_restored_at_start() {
    let store = Arc::new(MemoryStore::new());
    store.put(keys::GLOBAL_ENABLED, &false).await.unwrap();

    let h = Harness::with_store(fast_config(), store, POST_URL, &post_page(IMAGE, &[])).await;
    assert!(!h.archiver.context().is_enabled());
}

#[tokio::test]
async fn test_enabled_flag_is_reread_from_store() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    assert!(h.archiver.context().is_enabled());

    h.store.put(keys::GLOBAL_ENABLED, &false).await.unwrap();
    assert_eq!(h.archiver.handle_page_change().await, PageChange::Disabled);
    assert!(!h.archiver.context().is_enabled());

    h.archiver.queue().enqueue_if_absent(IMAGE).await.unwrap();
    assert_eq!(h.archiver.drain().await.status, DrainStatus::Disabled);
    assert!(h.submitter.calls().is_empty());
    assert!(!h.archiver.status().await.unwrap().enabled);

    h.store.put(keys::GLOBAL_ENABLED, &true).await.unwrap();
    assert!(matches!(
        h.archiver.handle_page_change().await,
        PageChange::Queued { .. }
    ));
    assert_eq!(h.submitter.call_count(IMAGE), 1);
}

#[tokio::test]
async fn test_corrupted_scalars_are_recovered() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.store.set(keys::LAST_PROCESSED_URL, json!(42)).await.unwrap();
    h.store
        .set(&keys::cooldown_key(&identity("abc123")), json!(1.7e12))
        .await
        .unwrap();
    h.store.set(keys::GLOBAL_ENABLED, json!("yes")).await.unwrap();

    assert!(matches!(
        h.archiver.handle_page_change().await,
        PageChange::Queued { ref identity, .. } if identity == &common::identity("abc123")
    ));
    assert_eq!(
        h.store.peek(keys::LAST_PROCESSED_URL),
        Some(json!(identity("abc123")))
    );
    assert_eq!(
        h.archiver.handle_page_change().await,
        PageChange::Duplicate(identity("abc123"))
    );
}

#[tokio::test]
async fn test_store_failure_aborts_without_deadlock() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;

    h.store.set_failing(true);
    assert!(matches!(
        h.archiver.handle_page_change().await,
        PageChange::Aborted(_)
    ));
    assert!(!h.archiver.context().is_evaluating());
    assert_eq!(h.archiver.context().state(), MonitorState::Idle);

    h.store.set_failing(false);
    let change = tokio::time::timeout(Duration::from_secs(5), h.archiver.handle_page_change())
        .await
        .expect("evaluation deadlocked");
    assert!(matches!(change, PageChange::Queued { .. }));
}

#[tokio::test]
async fn test_reveal_click_queues_revealed_content() {
    let h = Harness::new(POST_URL, &hidden_post_page(&[])).await;
    let revealed = "https://media.example.net/hidden.mp4";

    let dom = h.dom.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        dom.set_html(hidden_post_page(&[revealed]));
    });

    let urls = h
        .archiver
        .handle_interaction(&ClickEvent::new("#reveal-label"))
        .await;

    assert_eq!(urls, vec![revealed.to_string()]);
    assert_eq!(h.submitter.calls(), vec![revealed.to_string()]);
    assert_eq!(h.store.peek(keys::LAST_PROCESSED_URL), None);
}

#[tokio::test]
async fn test_reveal_click_is_ignored_while_disabled() {
    let h = Harness::new(POST_URL, &hidden_post_page(&["https://media.example.net/x"])).await;
    h.store.put(keys::GLOBAL_ENABLED, &false).await.unwrap();

    let urls = h
        .archiver
        .handle_interaction(&ClickEvent::new("#reveal-label"))
        .await;

    assert!(urls.is_empty());
    assert!(h.submitter.calls().is_empty());
    assert!(h.queued_urls().await.is_empty());
}

#[tokio::test]
async fn test_reveal_click_is_not_blocked_by_cooldown() {
    let h = Harness::new(POST_URL, &hidden_post_page(&[])).await;
    h.archiver
        .ledger()
        .record_success(&identity("abc123"), now_millis())
        .await
        .unwrap();
    assert_eq!(
        h.archiver.handle_page_change().await,
        PageChange::OnCooldown(identity("abc123"))
    );

    let revealed = "https://media.example.net/hidden.mp4";
    let dom = h.dom.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        dom.set_html(hidden_post_page(&[revealed]));
    });

    let urls = h
        .archiver
        .handle_interaction(&ClickEvent::new("#reveal-label"))
        .await;

    assert_eq!(urls, vec![revealed.to_string()]);
    assert_eq!(h.submitter.calls(), vec![revealed.to_string()]);
}

#[tokio::test]
async fn test_clicks_elsewhere_are_ignored() {
    let h = Harness::new(POST_URL, &hidden_post_page(&["https://media.example.net/x"])).await;

    for target in ["#first a.title", "body", "#does-not-exist", "::not a selector"] {
        assert!(
            h.archiver
                .handle_interaction(&ClickEvent::new(target))
                .await
                .is_empty(),
            "{target}"
        );
    }
    assert!(h.submitter.calls().is_empty());
}

#[tokio::test]
async fn test_manual_save_bypasses_queue_and_cooldown() {
    let mut h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.archiver
        .ledger()
        .record_success(POST_URL, now_millis())
        .await
        .unwrap();

    assert_eq!(
        h.archiver.save_now().await,
        Some(SubmitOutcome::Archived { status: 200 })
    );
    assert_eq!(h.submitter.calls(), vec![POST_URL.to_string()]);
    assert!(h.drain_notifications().contains(&"✔ Saved!".to_string()));

    h.submitter.fail_everything(SubmitOutcome::TimedOut);
    assert_eq!(h.archiver.save_now().await, Some(SubmitOutcome::TimedOut));
    assert!(h.drain_notifications().contains(&"⏲ Timeout".to_string()));
    assert!(h.queued_urls().await.is_empty());
}

#[tokio::test]
async fn test_manual_save_ignores_clicks_while_busy() {
    let config = kodegen_tools_autoarchive::ArchiverConfig::builder()
        .save_rearm_ms(60_000)
        .build()
        .unwrap();
    let h = Harness::with_store(
        config,
        Arc::new(MemoryStore::new()),
        POST_URL,
        &post_page(IMAGE, &[]),
    )
    .await;

    assert!(h.archiver.save_now().await.is_some());
    assert!(h.archiver.save_now().await.is_none());
    assert_eq!(h.submitter.calls().len(), 1);
}

#[tokio::test]
async fn test_status_reports_queue_and_last_seen() {
    let h = Harness::new(POST_URL, &post_page(IMAGE, &[])).await;
    h.submitter.fail_everything(SubmitOutcome::Rejected { status: 500 });
    h.archiver.handle_page_change().await;

    let status = h.archiver.status().await.unwrap();
    assert!(status.enabled);
    assert_eq!(status.queued, 2);
    assert!(!status.draining);
    assert_eq!(status.last_seen, identity("abc123"));
}

#[tokio::test]
async fn test_run_loop_debounces_navigation_bursts() {
    let h = Harness::new("https://www.reddit.com/", &listing_page()).await;
    let (tx, rx) = mpsc::channel(16);
    let monitor = tokio::spawn(Arc::clone(&h.archiver).run(rx));

    h.dom.navigate(POST_URL, post_page(IMAGE, &[]));
    for _ in 0..5 {
        tx.send(NavigationSignal::HistoryChanged).await.unwrap();
    }
    tx.send(NavigationSignal::PopState).await.unwrap();

    let archived = identity("abc123");
    tokio::time::timeout(Duration::from_secs(5), async {
        while h.submitter.call_count(IMAGE) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("navigation was never evaluated");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.submitter.call_count(&archived), 1);

    drop(tx);
    tokio::time::timeout(Duration::from_secs(5), monitor)
        .await
        .expect("monitor did not stop")
        .unwrap();
}
