//! Phoenix Channels subscriber.

use crate::endpoint::socket_url;
use crate::events::ChannelEvent;
use f1_live_proto::events::PHOENIX_TOPIC;
use f1_live_proto::{Frame, RefCounter, Reply, ReservedEvent};
use futures_util::{Sink, SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use url::Url;

/// Capacity of the event channel handed to the consumer.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Configuration for the Phoenix socket.
#[derive(Debug, Clone)]
pub struct PhoenixSocketConfig {
    /// Socket endpoint (e.g., <ws://localhost:4000/socket>)
    pub endpoint: String,
    /// Extra query parameters sent on connect
    pub params: Vec<(String, String)>,
    /// Heartbeat interval
    pub heartbeat_interval: Duration,
    /// Delay before each reconnect attempt, by attempt number
    pub reconnect_after: Vec<Duration>,
    /// Delay once the schedule is exhausted
    pub reconnect_ceiling: Duration,
}

impl Default for PhoenixSocketConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:4000/socket".to_string(),
            params: Vec::new(),
            heartbeat_interval: Duration::from_secs(30),
            reconnect_after: [10, 50, 100, 150, 200, 250, 500, 1000, 2000]
                .into_iter()
                .map(Duration::from_millis)
                .collect(),
            reconnect_ceiling: Duration::from_secs(5),
        }
    }
}

impl PhoenixSocketConfig {
    /// Delay before reconnect attempt `attempt` (zero-based).
    #[must_use]
    pub fn reconnect_delay(&self, attempt: usize) -> Duration {
        self.reconnect_after
            .get(attempt)
            .copied()
            .unwrap_or(self.reconnect_ceiling)
    }
}

/// Subscriber for a single Phoenix channel topic.
pub struct PhoenixSubscriber {
    url: Url,
    topic: String,
    join_payload: Value,
    config: PhoenixSocketConfig,
}

impl PhoenixSubscriber {
    /// Create a new subscriber.
    ///
    /// # Errors
    ///
    /// Returns error if the socket endpoint is invalid.
    pub fn new(
        config: PhoenixSocketConfig,
        topic: impl Into<String>,
        join_payload: Value,
    ) -> Result<Self, SubscriberError> {
        let url = socket_url(&config.endpoint, &config.params)?;

        Ok(Self {
            url,
            topic: topic.into(),
            join_payload,
            config,
        })
    }

    /// Resolved websocket URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Start the transport.
    ///
    /// Returns a channel receiver for channel events. Dropping the receiver
    /// stops the transport.
    #[must_use]
    pub fn start(self) -> mpsc::Receiver<ChannelEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut attempt = 0;
            loop {
                match self.run_session(&tx).await {
                    Ok(SessionEnd::ReceiverDropped) => {
                        tracing::info!("Event receiver dropped, stopping subscriber");
                        break;
                    }
                    Ok(SessionEnd::Dropped) => {
                        attempt = 0;
                        if tx.send(ChannelEvent::Disconnected).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, url = %self.url, "Phoenix socket error");
                    }
                }

                let delay = self.config.reconnect_delay(attempt);
                attempt += 1;
                tracing::info!(?delay, attempt, "Reconnecting to Phoenix socket");

                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = tx.closed() => break,
                }
            }
        });

        rx
    }

    /// Run one socket connection until it drops.
    async fn run_session(
        &self,
        tx: &mpsc::Sender<ChannelEvent>,
    ) -> Result<SessionEnd, SubscriberError> {
        let (stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| SubscriberError::Connection(e.to_string()))?;

        tracing::info!(url = %self.url, "Connected to Phoenix socket");

        let (mut sink, mut stream) = stream.split();
        let mut refs = RefCounter::default();
        let join_ref = refs.next_ref();

        send_frame(
            &mut sink,
            &Frame::join(join_ref.clone(), &self.topic, self.join_payload.clone()),
        )
        .await?;
        tracing::info!(topic = %self.topic, join_ref = %join_ref, "Joining channel");

        let period = self.config.heartbeat_interval;
        let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = stream.next() => {
                    let text = match message {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(close))) => {
                            tracing::info!(?close, "Phoenix socket closed by server");
                            return Ok(SessionEnd::Dropped);
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Phoenix socket read error");
                            return Ok(SessionEnd::Dropped);
                        }
                        None => return Ok(SessionEnd::Dropped),
                    };

                    let frame = match Frame::decode(&text) {
                        Ok(frame) => frame,
                        Err(err) => {
                            tracing::warn!(error = %err, text_len = text.len(), "Failed to decode frame");
                            continue;
                        }
                    };

                    tracing::debug!(topic = %frame.topic, event = %frame.event, "Received frame");

                    match route(&self.topic, &join_ref, frame) {
                        Routed::Emit(event) => {
                            if tx.send(event).await.is_err() {
                                leave(&mut sink, &mut refs, &join_ref, &self.topic).await;
                                return Ok(SessionEnd::ReceiverDropped);
                            }
                        }
                        Routed::Rejoin => {
                            tracing::warn!(topic = %self.topic, "Channel errored on server, reconnecting");
                            return Ok(SessionEnd::Dropped);
                        }
                        Routed::Ignore => {}
                    }
                }
                _ = heartbeat.tick() => {
                    if let Err(e) = send_frame(&mut sink, &Frame::heartbeat(refs.next_ref())).await {
                        tracing::warn!(error = %e, "Failed to send heartbeat");
                        return Ok(SessionEnd::Dropped);
                    }
                    tracing::trace!("Heartbeat sent");
                }
                () = tx.closed() => {
                    leave(&mut sink, &mut refs, &join_ref, &self.topic).await;
                    return Ok(SessionEnd::ReceiverDropped);
                }
            }
        }
    }
}

/// How a socket session ended.
enum SessionEnd {
    /// Socket dropped or the channel failed; reconnect
    Dropped,
    /// Nobody is listening any more; stop
    ReceiverDropped,
}

/// What to do with an inbound frame.
#[derive(Debug, PartialEq)]
enum Routed {
    Emit(ChannelEvent),
    Rejoin,
    Ignore,
}

fn route(topic: &str, join_ref: &str, frame: Frame) -> Routed {
    if frame.topic != topic {
        if frame.topic == PHOENIX_TOPIC {
            tracing::trace!(msg_ref = ?frame.msg_ref, "Heartbeat acknowledged");
        }
        return Routed::Ignore;
    }

    match frame.reserved_event() {
        Some(ReservedEvent::Reply) => {
            if frame.msg_ref.as_deref() != Some(join_ref) {
                return Routed::Ignore;
            }
            match Reply::parse(&frame.payload) {
                Ok(reply) if reply.is_ok() => Routed::Emit(ChannelEvent::Joined {
                    response: reply.response,
                }),
                Ok(reply) => Routed::Emit(ChannelEvent::JoinRejected {
                    status: reply.status.as_str().to_string(),
                    response: reply.response,
                }),
                Err(err) => {
                    tracing::warn!(error = %err, "Malformed join reply");
                    Routed::Emit(ChannelEvent::JoinRejected {
                        status: "invalid".to_string(),
                        response: frame.payload,
                    })
                }
            }
        }
        Some(ReservedEvent::Error | ReservedEvent::Close) => {
            if frame.join_ref.as_deref().is_some_and(|r| r != join_ref) {
                Routed::Ignore
            } else {
                Routed::Rejoin
            }
        }
        Some(_) => Routed::Ignore,
        None => Routed::Emit(ChannelEvent::Push {
            event: frame.event,
            payload: frame.payload,
        }),
    }
}

async fn send_frame<S>(sink: &mut S, frame: &Frame) -> Result<(), SubscriberError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let text = frame
        .encode()
        .map_err(|e| SubscriberError::Send(e.to_string()))?;
    sink.send(Message::Text(text))
        .await
        .map_err(|e| SubscriberError::Send(e.to_string()))
}

async fn leave<S>(sink: &mut S, refs: &mut RefCounter, join_ref: &str, topic: &str)
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let frame = Frame::leave(join_ref.to_string(), refs.next_ref(), topic);
    if let Err(e) = send_frame(sink, &frame).await {
        tracing::debug!(error = %e, "Failed to send leave");
    }
    let _ = sink.close().await;
}

/// Errors that can occur with the subscriber.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubscriberError {
    /// Invalid socket URL
    #[error("invalid socket URL: {0}")]
    InvalidUrl(String),
    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),
    /// Sending a frame failed
    #[error("send error: {0}")]
    Send(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOPIC: &str = "f1:live";

    fn reply(msg_ref: &str, status: &str) -> Frame {
        Frame::new(
            Some(msg_ref.to_string()),
            Some(msg_ref.to_string()),
            TOPIC,
            "phx_reply",
            json!({"status": status, "response": {"id": 1}}),
        )
    }

    #[test]
    fn join_reply_ok_is_joined() {
        assert_eq!(
            route(TOPIC, "1", reply("1", "ok")),
            Routed::Emit(ChannelEvent::Joined {
                response: json!({"id": 1})
            })
        );
    }

    #[test]
    fn join_reply_error_is_rejected() {
        assert_eq!(
            route(TOPIC, "1", reply("1", "error")),
            Routed::Emit(ChannelEvent::JoinRejected {
                status: "error".to_string(),
                response: json!({"id": 1})
            })
        );
    }

    #[test]
    fn replies_to_other_pushes_are_ignored() {
        assert_eq!(route(TOPIC, "1", reply("5", "ok")), Routed::Ignore);
    }

    #[test]
    fn pushes_on_topic_are_forwarded() {
        let frame = Frame::push(TOPIC, "f1_update", json!({"feed": "TimingData"}));
        assert_eq!(
            route(TOPIC, "1", frame),
            Routed::Emit(ChannelEvent::Push {
                event: "f1_update".to_string(),
                payload: json!({"feed": "TimingData"})
            })
        );
    }

    #[test]
    fn other_topics_and_heartbeat_replies_are_ignored() {
        let frame = Frame::push("other:topic", "f1_update", json!({}));
        assert_eq!(route(TOPIC, "1", frame), Routed::Ignore);

        let frame = Frame::new(
            None,
            Some("2".to_string()),
            PHOENIX_TOPIC,
            "phx_reply",
            json!({"status": "ok", "response": {}}),
        );
        assert_eq!(route(TOPIC, "1", frame), Routed::Ignore);
    }

    #[test]
    fn channel_error_triggers_rejoin_for_current_join_only() {
        let current = Frame::new(Some("1".to_string()), None, TOPIC, "phx_error", json!({}));
        assert_eq!(route(TOPIC, "1", current), Routed::Rejoin);

        let stale = Frame::new(Some("0".to_string()), None, TOPIC, "phx_close", json!({}));
        assert_eq!(route(TOPIC, "1", stale), Routed::Ignore);
    }

    #[test]
    fn reconnect_schedule() {
        let config = PhoenixSocketConfig::default();
        assert_eq!(config.reconnect_delay(0), Duration::from_millis(10));
        assert_eq!(config.reconnect_delay(8), Duration::from_millis(2000));
        assert_eq!(config.reconnect_delay(9), Duration::from_secs(5));
        assert_eq!(config.reconnect_delay(100), Duration::from_secs(5));
    }

    #[test]
    fn new_rejects_invalid_endpoint() {
        let config = PhoenixSocketConfig {
            endpoint: "mqtt://localhost:1883".to_string(),
            ..PhoenixSocketConfig::default()
        };
        assert!(matches!(
            PhoenixSubscriber::new(config, TOPIC, json!({})),
            Err(SubscriberError::InvalidUrl(_))
        ));
    }
}
