//! Reply payloads and application events.

use crate::events::{DATA_SOURCE, F1_UPDATE};
use f1_live_core::{DataSource, FeedError, FeedUpdate, Inbound};
use serde::Deserialize;
use serde_json::Value;

/// Outcome carried by a `phx_reply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyStatus {
    /// Push accepted
    Ok,
    /// Push rejected
    Error,
    /// Any other status string
    Other(String),
}

impl From<String> for ReplyStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ok" => Self::Ok,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl ReplyStatus {
    /// Status as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Other(other) => other,
        }
    }
}

/// Payload of a `phx_reply`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Reply status
    pub status: ReplyStatus,
    /// Server response body
    pub response: Value,
}

impl Reply {
    /// Parse a reply payload.
    ///
    /// # Errors
    ///
    /// Returns error if the payload has no string `status`.
    pub fn parse(payload: &Value) -> Result<Self, MessageError> {
        #[derive(Deserialize)]
        struct Raw {
            status: String,
            #[serde(default)]
            response: Value,
        }

        let raw = Raw::deserialize(payload).map_err(|e| MessageError::Deserialize(e.to_string()))?;
        Ok(Self {
            status: raw.status.into(),
            response: raw.response,
        })
    }

    /// Whether the push was accepted.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ReplyStatus::Ok
    }
}

/// `f1_update` payload.
#[derive(Debug, Clone, Deserialize)]
struct FeedEnvelope {
    feed: String,
    #[serde(default)]
    data: Value,
}

/// `data_source` payload.
#[derive(Debug, Clone, Deserialize)]
struct DataSourceNotice {
    #[serde(default)]
    source: Value,
}

/// Application events pushed on the feed topic.
pub struct ChannelMessage;

impl ChannelMessage {
    /// Convert a pushed event into an updater message.
    ///
    /// Unknown events and unknown feed tags yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if a known event carries a payload that cannot be decoded.
    pub fn classify(event: &str, payload: Value) -> Result<Option<Inbound>, MessageError> {
        match event {
            F1_UPDATE => {
                let envelope: FeedEnvelope = serde_json::from_value(payload)
                    .map_err(|e| MessageError::Deserialize(e.to_string()))?;
                let update = FeedUpdate::from_tagged(&envelope.feed, envelope.data)?;
                Ok(update.map(Inbound::Feed))
            }
            DATA_SOURCE => {
                let notice: DataSourceNotice = serde_json::from_value(payload)
                    .map_err(|e| MessageError::Deserialize(e.to_string()))?;
                // Only the string "live" is live; any other value is the simulator.
                let source = DataSource::from_source(notice.source.as_str().unwrap_or_default());
                tracing::info!(source = %notice.source, ?source, "Data source changed");
                Ok(Some(Inbound::DataSource(source)))
            }
            _ => {
                tracing::trace!(event, "Ignoring channel event");
                Ok(None)
            }
        }
    }
}

/// Errors that can occur encoding or decoding messages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MessageError {
    /// Serialization failed
    #[error("serialize error: {0}")]
    Serialize(String),
    /// Deserialization failed
    #[error("deserialize error: {0}")]
    Deserialize(String),
    /// Feed payload could not be decoded
    #[error(transparent)]
    Feed(#[from] FeedError),
}
