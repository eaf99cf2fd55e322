//! Agent runtime orchestration.

use crate::config::AgentConfig;
use crate::snapshot::write_snapshot;
use anyhow::{Context, Result};
use f1_live_adapter_phoenix::{ChannelEvent, PhoenixSubscriber};
use f1_live_core::{ConnectionStatus, Inbound, Page, Updater};
use f1_live_proto::ChannelMessage;

/// The main agent runtime.
pub struct Agent {
    config: AgentConfig,
    subscriber: PhoenixSubscriber,
}

impl Agent {
    /// Create a new agent.
    ///
    /// # Errors
    ///
    /// Returns error if the socket endpoint is invalid.
    pub fn new(config: AgentConfig) -> Result<Self> {
        let subscriber = PhoenixSubscriber::new(
            config.socket.clone(),
            config.topic.clone(),
            config.join_payload.clone(),
        )
        .context("Failed to create Phoenix subscriber")?;

        Ok(Self { config, subscriber })
    }

    /// Run the agent's main loop until Ctrl+C or the transport stops.
    ///
    /// # Errors
    ///
    /// Returns error if the shutdown signal cannot be installed.
    pub async fn run(self) -> Result<()> {
        tracing::info!(url = %self.subscriber.url(), "Starting agent runtime");

        let mut updater = Updater::new(Page::standard(), self.config.updater.clone());
        let mut events = self.subscriber.start();

        tracing::info!("Agent running, press Ctrl+C to stop");

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::warn!("Subscriber stopped");
                        break;
                    };

                    let Some(inbound) = to_inbound(event) else {
                        continue;
                    };

                    if updater.handle(inbound) {
                        if let Some(path) = self.config.snapshot_path.as_deref() {
                            if let Err(e) = write_snapshot(path, updater.dom()).await {
                                tracing::warn!(error = %e, "Failed to write page snapshot");
                            }
                        }
                    }
                }

                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl+C")?;
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!("Agent stopped");
        Ok(())
    }
}

/// Map a channel event to an updater message.
///
/// Only join outcomes move the connection indicator; a dropped socket is
/// followed by a rejoin that reports its own outcome.
pub(crate) fn to_inbound(event: ChannelEvent) -> Option<Inbound> {
    match event {
        ChannelEvent::Joined { .. } => {
            tracing::info!("Joined live timing channel");
            Some(Inbound::Connection(ConnectionStatus::Connected))
        }
        ChannelEvent::JoinRejected { status, response } => {
            tracing::warn!(%status, %response, "Join rejected");
            Some(Inbound::Connection(ConnectionStatus::Disconnected))
        }
        ChannelEvent::Push { event, payload } => match ChannelMessage::classify(&event, payload) {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!(%event, error = %e, "Dropping undecodable message");
                None
            }
        },
        ChannelEvent::Disconnected => {
            tracing::warn!("Socket disconnected, reconnecting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_live_core::{DataSource, FeedUpdate};
    use serde_json::json;

    #[test]
    fn join_outcomes_drive_connection_status() {
        assert_eq!(
            to_inbound(ChannelEvent::Joined { response: json!({}) }),
            Some(Inbound::Connection(ConnectionStatus::Connected))
        );
        assert_eq!(
            to_inbound(ChannelEvent::JoinRejected {
                status: "error".to_string(),
                response: json!({"reason": "unauthorized"}),
            }),
            Some(Inbound::Connection(ConnectionStatus::Disconnected))
        );
        assert_eq!(to_inbound(ChannelEvent::Disconnected), None);
    }

    #[test]
    fn pushes_are_classified() {
        let inbound = to_inbound(ChannelEvent::Push {
            event: "data_source".to_string(),
            payload: json!({"source": "simulator"}),
        });
        assert_eq!(inbound, Some(Inbound::DataSource(DataSource::Simulator)));

        let inbound = to_inbound(ChannelEvent::Push {
            event: "f1_update".to_string(),
            payload: json!({"feed": "WeatherData", "data": {"TrackTemp": "41.2"}}),
        });
        assert!(matches!(
            inbound,
            Some(Inbound::Feed(FeedUpdate::WeatherData(Some(_))))
        ));
    }

    #[test]
    fn undecodable_pushes_are_dropped() {
        let inbound = to_inbound(ChannelEvent::Push {
            event: "f1_update".to_string(),
            payload: json!("garbage"),
        });
        assert_eq!(inbound, None);
    }
}
