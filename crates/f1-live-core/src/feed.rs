//! Feed tags and inbound messages.

use crate::model::{
    DriverList, RaceControl, SessionInfo, TimingData, TrackStatus, WeatherData,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Telemetry category carried by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    /// Per-car timing lines
    TimingData,
    /// Driver metadata
    DriverList,
    /// Meeting and session details
    SessionInfo,
    /// Weather readings
    WeatherData,
    /// Track flag status
    TrackStatus,
    /// Race control message log
    RaceControlMessages,
}

impl FeedKind {
    /// Look up a feed tag. Unknown tags return `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "TimingData" => Some(Self::TimingData),
            "DriverList" => Some(Self::DriverList),
            "SessionInfo" => Some(Self::SessionInfo),
            "WeatherData" => Some(Self::WeatherData),
            "TrackStatus" => Some(Self::TrackStatus),
            "RaceControlMessages" => Some(Self::RaceControlMessages),
            _ => None,
        }
    }

    /// The tag as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimingData => "TimingData",
            Self::DriverList => "DriverList",
            Self::SessionInfo => "SessionInfo",
            Self::WeatherData => "WeatherData",
            Self::TrackStatus => "TrackStatus",
            Self::RaceControlMessages => "RaceControlMessages",
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded feed update.
///
/// Payloads sent as `null` decode to `None` where the kind has a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    /// `TimingData`
    TimingData(TimingData),
    /// `DriverList`
    DriverList(DriverList),
    /// `SessionInfo`
    SessionInfo(Option<SessionInfo>),
    /// `WeatherData`
    WeatherData(Option<WeatherData>),
    /// `TrackStatus`
    TrackStatus(Option<TrackStatus>),
    /// `RaceControlMessages`
    RaceControlMessages(RaceControl),
}

impl FeedUpdate {
    /// Decode a payload for a known feed kind.
    ///
    /// # Errors
    ///
    /// Returns error if the payload has a shape no record can accept.
    pub fn decode(kind: FeedKind, data: Value) -> Result<Self, FeedError> {
        Ok(match kind {
            FeedKind::TimingData => Self::TimingData(decode_or_default(kind, data)?),
            FeedKind::DriverList => Self::DriverList(decode_or_default(kind, data)?),
            FeedKind::SessionInfo => Self::SessionInfo(decode(kind, data)?),
            FeedKind::WeatherData => Self::WeatherData(decode(kind, data)?),
            FeedKind::TrackStatus => Self::TrackStatus(decode(kind, data)?),
            FeedKind::RaceControlMessages => {
                Self::RaceControlMessages(decode_or_default(kind, data)?)
            }
        })
    }

    /// Decode a tagged payload. Unknown tags yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if the tag is known but the payload cannot be decoded.
    pub fn from_tagged(tag: &str, data: Value) -> Result<Option<Self>, FeedError> {
        match FeedKind::from_tag(tag) {
            Some(kind) => Self::decode(kind, data).map(Some),
            None => {
                tracing::trace!(tag, "Ignoring unknown feed tag");
                Ok(None)
            }
        }
    }

    /// Feed kind of this update.
    #[must_use]
    pub fn kind(&self) -> FeedKind {
        match self {
            Self::TimingData(_) => FeedKind::TimingData,
            Self::DriverList(_) => FeedKind::DriverList,
            Self::SessionInfo(_) => FeedKind::SessionInfo,
            Self::WeatherData(_) => FeedKind::WeatherData,
            Self::TrackStatus(_) => FeedKind::TrackStatus,
            Self::RaceControlMessages(_) => FeedKind::RaceControlMessages,
        }
    }
}

fn decode<T: DeserializeOwned>(kind: FeedKind, data: Value) -> Result<Option<T>, FeedError> {
    serde_json::from_value(data).map_err(|e| FeedError::Decode {
        feed: kind,
        reason: e.to_string(),
    })
}

fn decode_or_default<T: DeserializeOwned + Default>(
    kind: FeedKind,
    data: Value,
) -> Result<T, FeedError> {
    decode(kind, data).map(Option::unwrap_or_default)
}

/// State of the channel join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Join acknowledged
    Connected,
    /// Join rejected
    Disconnected,
}

/// Where the server is sourcing its feed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The live timing service
    Live,
    /// Anything else (replays, simulators)
    Simulator,
}

impl DataSource {
    /// Classify a `source` value. Only `"live"` counts as live.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        if source == "live" {
            Self::Live
        } else {
            Self::Simulator
        }
    }
}

/// A message delivered to the updater.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Join outcome
    Connection(ConnectionStatus),
    /// `data_source` event
    DataSource(DataSource),
    /// Feed update
    Feed(FeedUpdate),
}

/// Errors decoding feed payloads.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FeedError {
    /// Payload could not be decoded into the feed's record
    #[error("{feed} payload decode error: {reason}")]
    Decode {
        /// Feed that failed
        feed: FeedKind,
        /// Decoder message
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_tag_is_ignored() {
        let update = FeedUpdate::from_tagged("CarData.z", json!({"anything": 1})).unwrap();
        assert!(update.is_none());
    }

    #[test]
    fn known_tags_round_trip_names() {
        for kind in [
            FeedKind::TimingData,
            FeedKind::DriverList,
            FeedKind::SessionInfo,
            FeedKind::WeatherData,
            FeedKind::TrackStatus,
            FeedKind::RaceControlMessages,
        ] {
            assert_eq!(FeedKind::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn null_payloads_decode_to_empty_records() {
        let update = FeedUpdate::decode(FeedKind::TimingData, Value::Null).unwrap();
        assert_eq!(update, FeedUpdate::TimingData(TimingData::default()));

        let update = FeedUpdate::decode(FeedKind::WeatherData, Value::Null).unwrap();
        assert_eq!(update, FeedUpdate::WeatherData(None));
    }

    #[test]
    fn mistyped_payload_is_a_decode_error() {
        let err = FeedUpdate::decode(FeedKind::SessionInfo, json!("not a record")).unwrap_err();
        assert!(err.to_string().starts_with("SessionInfo payload decode error"));
    }

    #[test]
    fn one_malformed_line_keeps_the_rest() {
        let update = FeedUpdate::decode(
            FeedKind::TimingData,
            json!({"Lines": {
                "1": {"Position": 1},
                "44": {"Position": 2, "LastLapTime": "1:30.000"}
            }}),
        )
        .unwrap();

        let FeedUpdate::TimingData(data) = update else {
            panic!("expected timing data");
        };
        assert_eq!(data.lines["1"].position, Some(1));
        assert_eq!(data.lines["44"].position, Some(2));
        assert_eq!(data.lines["44"].last_lap_time, None);

        let update = FeedUpdate::decode(
            FeedKind::DriverList,
            json!({"1": {"Tla": "VER"}, "44": {"Tla": ["HAM"]}}),
        )
        .unwrap();
        let FeedUpdate::DriverList(list) = update else {
            panic!("expected driver list");
        };
        assert_eq!(list.0["1"].tla.as_deref(), Some("VER"));
        assert_eq!(list.0["44"].tla, None);
    }

    #[test]
    fn data_source_classification() {
        assert_eq!(DataSource::from_source("live"), DataSource::Live);
        assert_eq!(DataSource::from_source("simulator"), DataSource::Simulator);
        assert_eq!(DataSource::from_source("LIVE"), DataSource::Simulator);
    }
}
