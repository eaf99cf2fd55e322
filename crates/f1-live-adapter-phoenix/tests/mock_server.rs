use f1_live_adapter_phoenix::{ChannelEvent, PhoenixSocketConfig, PhoenixSubscriber};
use f1_live_proto::{Frame, ReservedEvent};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

const TOPIC: &str = "f1:live";

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("ws://{addr}/socket"))
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = listener.accept().await.unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

/// Read frames until the join arrives, skipping heartbeats.
async fn read_join(ws: &mut WebSocketStream<TcpStream>) -> Frame {
    loop {
        let message = ws.next().await.unwrap().unwrap();
        if let Message::Text(text) = message {
            let frame = Frame::decode(&text).unwrap();
            if frame.reserved_event() == Some(ReservedEvent::Join) {
                return frame;
            }
        }
    }
}

async fn send(ws: &mut WebSocketStream<TcpStream>, frame: &Frame) {
    ws.send(Message::Text(frame.encode().unwrap())).await.unwrap();
}

fn reply(join: &Frame, status: &str) -> Frame {
    Frame::new(
        join.join_ref.clone(),
        join.msg_ref.clone(),
        TOPIC,
        "phx_reply",
        json!({"status": status, "response": {}}),
    )
}

async fn next_event(rx: &mut mpsc::Receiver<ChannelEvent>) -> ChannelEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for channel event")
        .expect("subscriber stopped")
}

fn subscriber(endpoint: String) -> PhoenixSubscriber {
    let config = PhoenixSocketConfig {
        endpoint,
        ..PhoenixSocketConfig::default()
    };
    PhoenixSubscriber::new(config, TOPIC, json!({})).unwrap()
}

#[tokio::test]
async fn joins_and_forwards_pushes() {
    let (listener, endpoint) = bind().await;
    let mut rx = subscriber(endpoint).start();

    let mut ws = accept(&listener).await;
    let join = read_join(&mut ws).await;
    assert_eq!(join.topic, TOPIC);
    assert_eq!(join.join_ref, join.msg_ref);

    send(&mut ws, &reply(&join, "ok")).await;
    send(
        &mut ws,
        &Frame::push(
            TOPIC,
            "f1_update",
            json!({"feed": "TrackStatus", "data": {"Status": "4"}}),
        ),
    )
    .await;

    assert_eq!(
        next_event(&mut rx).await,
        ChannelEvent::Joined { response: json!({}) }
    );
    assert_eq!(
        next_event(&mut rx).await,
        ChannelEvent::Push {
            event: "f1_update".to_string(),
            payload: json!({"feed": "TrackStatus", "data": {"Status": "4"}}),
        }
    );
}

#[tokio::test]
async fn reports_rejected_join() {
    let (listener, endpoint) = bind().await;
    let mut rx = subscriber(endpoint).start();

    let mut ws = accept(&listener).await;
    let join = read_join(&mut ws).await;
    send(&mut ws, &reply(&join, "error")).await;

    assert_eq!(
        next_event(&mut rx).await,
        ChannelEvent::JoinRejected {
            status: "error".to_string(),
            response: json!({}),
        }
    );
}

#[tokio::test]
async fn reconnects_and_rejoins_after_drop() {
    let (listener, endpoint) = bind().await;
    let mut rx = subscriber(endpoint).start();

    let mut ws = accept(&listener).await;
    let join = read_join(&mut ws).await;
    send(&mut ws, &reply(&join, "ok")).await;
    assert!(matches!(
        next_event(&mut rx).await,
        ChannelEvent::Joined { .. }
    ));

    ws.close(None).await.unwrap();
    drop(ws);
    assert_eq!(next_event(&mut rx).await, ChannelEvent::Disconnected);

    let mut ws = accept(&listener).await;
    let join = read_join(&mut ws).await;
    assert_eq!(join.join_ref.as_deref(), Some("1"));
    send(&mut ws, &reply(&join, "ok")).await;
    assert!(matches!(
        next_event(&mut rx).await,
        ChannelEvent::Joined { .. }
    ));
}
