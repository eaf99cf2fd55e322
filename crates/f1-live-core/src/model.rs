//! Typed feed records.
//!
//! Every field is optional: the feed sends partial updates and is not
//! schema-checked. Field names follow the feed's `PascalCase` keys.

use crate::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A timing value with its fastest-lap markers.
///
/// Used for last lap, best lap and each sector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimedValue {
    /// Formatted time, e.g. `1:32.418`
    #[serde(deserialize_with = "de::text")]
    pub value: Option<String>,
    /// The driver's own best
    #[serde(deserialize_with = "de::flag")]
    pub personal_fastest: bool,
    /// The session's best
    #[serde(deserialize_with = "de::flag")]
    pub overall_fastest: bool,
}

impl TimedValue {
    /// Create a plain timing value with no fastest markers.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Interval to the car ahead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Interval {
    /// Formatted interval, e.g. `+0.412`
    #[serde(deserialize_with = "de::text")]
    pub value: Option<String>,
}

/// Tyre compound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TyreCompound {
    /// Soft slick
    Soft,
    /// Medium slick
    Medium,
    /// Hard slick
    Hard,
    /// Intermediate
    Intermediate,
    /// Full wet
    Wet,
    /// Anything else the feed sends (`UNKNOWN`, `TEST_UNKNOWN`, ...)
    Other(String),
}

impl TyreCompound {
    /// The compound as the feed spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Soft => "SOFT",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Intermediate => "INTERMEDIATE",
            Self::Wet => "WET",
            Self::Other(other) => other,
        }
    }

    /// Background class of the compound badge.
    #[must_use]
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Soft => "bg-red-600",
            Self::Medium => "bg-yellow-600",
            Self::Hard => "bg-gray-600",
            Self::Intermediate => "bg-green-600",
            Self::Wet => "bg-blue-600",
            Self::Other(_) => "bg-gray-700",
        }
    }
}

impl From<String> for TyreCompound {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SOFT" => Self::Soft,
            "MEDIUM" => Self::Medium,
            "HARD" => Self::Hard,
            "INTERMEDIATE" => Self::Intermediate,
            "WET" => Self::Wet,
            _ => Self::Other(value),
        }
    }
}

impl From<TyreCompound> for String {
    fn from(value: TyreCompound) -> Self {
        value.as_str().to_string()
    }
}

/// Current tyre set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Tyre {
    /// Compound fitted
    #[serde(deserialize_with = "de::lenient")]
    pub compound: Option<TyreCompound>,
    /// Laps on this set
    #[serde(deserialize_with = "de::count")]
    pub total_laps: Option<u32>,
}

/// Timing line for one car.
///
/// Incoming lines are partial; see [`TimingEntry::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimingEntry {
    /// Classified position
    #[serde(deserialize_with = "de::count")]
    pub position: Option<u32>,
    /// Last completed lap
    #[serde(deserialize_with = "de::lenient")]
    pub last_lap_time: Option<TimedValue>,
    /// Best lap of the session
    #[serde(deserialize_with = "de::lenient")]
    pub best_lap_time: Option<TimedValue>,
    /// Gap to the leader, e.g. `+12.331` or `1 L`
    #[serde(deserialize_with = "de::text")]
    pub gap_to_leader: Option<String>,
    /// Interval to the car ahead
    #[serde(deserialize_with = "de::lenient")]
    pub interval_to_position_ahead: Option<Interval>,
    /// Sector times, in track order
    #[serde(deserialize_with = "de::positional_seq")]
    pub sectors: Option<Vec<TimedValue>>,
    /// Current tyre set
    #[serde(deserialize_with = "de::lenient")]
    pub tyre: Option<Tyre>,
}

impl TimingEntry {
    /// Shallow merge: fields present in `update` overwrite, absent fields keep
    /// their current value.
    pub fn merge(&mut self, update: TimingEntry) {
        overwrite(&mut self.position, update.position);
        overwrite(&mut self.last_lap_time, update.last_lap_time);
        overwrite(&mut self.best_lap_time, update.best_lap_time);
        overwrite(&mut self.gap_to_leader, update.gap_to_leader);
        overwrite(
            &mut self.interval_to_position_ahead,
            update.interval_to_position_ahead,
        );
        overwrite(&mut self.sectors, update.sectors);
        overwrite(&mut self.tyre, update.tyre);
    }

    /// Position used for ordering and display. The feed sends `0` for cars
    /// that are not classified yet, which reads as no position.
    #[must_use]
    pub fn classified_position(&self) -> Option<u32> {
        self.position.filter(|&position| position != 0)
    }

    /// Sector `index` (zero-based), if the feed has sent it.
    #[must_use]
    pub fn sector(&self, index: usize) -> Option<&TimedValue> {
        self.sectors.as_ref().and_then(|sectors| sectors.get(index))
    }
}

fn overwrite<T>(slot: &mut Option<T>, update: Option<T>) {
    if update.is_some() {
        *slot = update;
    }
}

/// `TimingData` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimingData {
    /// Partial timing lines keyed by car number
    #[serde(deserialize_with = "de::keyed_records")]
    pub lines: BTreeMap<String, TimingEntry>,
}

/// Driver metadata for one car.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DriverInfo {
    /// Three-letter code, e.g. `VER`
    #[serde(deserialize_with = "de::text")]
    pub tla: Option<String>,
    /// Full name
    #[serde(deserialize_with = "de::text")]
    pub full_name: Option<String>,
}

impl DriverInfo {
    /// A record with no fields, used when a car has no driver entry yet.
    pub const EMPTY: Self = Self {
        tla: None,
        full_name: None,
    };
}

/// `DriverList` payload: driver records keyed by car number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DriverList(pub BTreeMap<String, DriverInfo>);

impl<'de> Deserialize<'de> for DriverList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        de::keyed_records(deserializer).map(Self)
    }
}

/// Meeting (event) details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Meeting {
    /// Meeting name, e.g. `Monaco Grand Prix`
    #[serde(deserialize_with = "de::text")]
    pub name: Option<String>,
}

/// `SessionInfo` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SessionInfo {
    /// Meeting the session belongs to
    #[serde(deserialize_with = "de::lenient")]
    pub meeting: Option<Meeting>,
    /// Session name, e.g. `Qualifying`
    #[serde(deserialize_with = "de::text")]
    pub name: Option<String>,
    /// Remaining session time, `HH:MM:SS`
    #[serde(deserialize_with = "de::text")]
    pub remaining_time: Option<String>,
}

/// `WeatherData` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WeatherData {
    /// Track temperature in °C
    #[serde(deserialize_with = "de::text")]
    pub track_temp: Option<String>,
    /// Air temperature in °C
    #[serde(deserialize_with = "de::text")]
    pub air_temp: Option<String>,
    /// Wind speed in km/h
    #[serde(deserialize_with = "de::text")]
    pub wind_speed: Option<String>,
}

/// `TrackStatus` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TrackStatus {
    /// Status code, e.g. `"2"`
    #[serde(deserialize_with = "de::string")]
    pub status: Option<String>,
    /// Free-text description sent alongside the code
    #[serde(deserialize_with = "de::text")]
    pub message: Option<String>,
}

impl TrackStatus {
    /// Flag shown for this status.
    #[must_use]
    pub fn flag(&self) -> TrackFlag {
        TrackFlag::from_code(self.status.as_deref())
    }
}

/// Track condition derived from a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFlag {
    /// Green, or any code not listed below
    Clear,
    /// Code `2`
    Yellow,
    /// Code `4`
    Red,
    /// Code `6`
    VirtualSafetyCar,
    /// Code `7`
    SafetyCar,
}

impl TrackFlag {
    /// Map a status code to a flag. Unknown and absent codes are `Clear`.
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("2") => Self::Yellow,
            Some("4") => Self::Red,
            Some("6") => Self::VirtualSafetyCar,
            Some("7") => Self::SafetyCar,
            _ => Self::Clear,
        }
    }

    /// Indicator colour name.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Clear => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::VirtualSafetyCar => "blue",
            Self::SafetyCar => "orange",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "Track Clear",
            Self::Yellow => "Yellow Flag",
            Self::Red => "Red Flag",
            Self::VirtualSafetyCar => "Virtual Safety Car",
            Self::SafetyCar => "Safety Car",
        }
    }
}

/// One race control message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RaceControlMessage {
    /// Message text
    #[serde(deserialize_with = "de::text")]
    pub message: Option<String>,
    /// Category, e.g. `Flag` or `Drs`
    #[serde(deserialize_with = "de::text")]
    pub category: Option<String>,
    /// UTC timestamp as sent
    #[serde(deserialize_with = "de::text")]
    pub utc: Option<String>,
}

/// `RaceControlMessages` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RaceControl {
    /// Messages in chronological order
    #[serde(deserialize_with = "de::indexed_seq")]
    pub messages: Option<Vec<RaceControlMessage>>,
}
