use f1_live_adapter_phoenix::{ChannelEvent, PhoenixSocketConfig, PhoenixSubscriber};
use f1_live_core::{Inbound, Page, Updater, UpdaterConfig};
use f1_live_proto::{ChannelMessage, DEFAULT_TOPIC};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn live_server_join_and_update() {
    if std::env::var("F1LIVE_INTEGRATION").is_err() {
        eprintln!("Skipping integration test; set F1LIVE_INTEGRATION=1 to run");
        return;
    }

    let endpoint = std::env::var("F1LIVE_SOCKET_URL")
        .unwrap_or_else(|_| "ws://localhost:4000/socket".to_string());
    let topic = std::env::var("F1LIVE_TOPIC").unwrap_or_else(|_| DEFAULT_TOPIC.to_string());

    let config = PhoenixSocketConfig {
        endpoint,
        ..PhoenixSocketConfig::default()
    };
    let mut events = PhoenixSubscriber::new(config, topic, json!({}))
        .expect("valid endpoint")
        .start();

    let joined = timeout(Duration::from_secs(10), events.recv())
        .await
        .expect("join timed out")
        .expect("subscriber stopped");
    assert!(
        matches!(joined, ChannelEvent::Joined { .. }),
        "unexpected first event: {joined:?}"
    );

    let mut updater = Updater::new(Page::standard(), UpdaterConfig::default());
    let rendered = timeout(Duration::from_secs(30), async {
        while let Some(event) = events.recv().await {
            let ChannelEvent::Push { event, payload } = event else {
                continue;
            };
            let Ok(Some(inbound)) = ChannelMessage::classify(&event, payload) else {
                continue;
            };
            if matches!(inbound, Inbound::Feed(_)) && updater.handle(inbound) {
                return true;
            }
        }
        false
    })
    .await
    .expect("no feed update within 30s");

    assert!(rendered);
    assert!(updater.dom().to_html().contains("<tbody id=\"timing-data-table-body\">"));
}
