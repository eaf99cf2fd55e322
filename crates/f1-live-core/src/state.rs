//! Client state and pure dispatch.
//!
//! [`ClientState::apply`] is the only place state changes. It returns the
//! region that needs redrawing; turning that into HTML and writing it to the
//! page happens elsewhere.

use crate::feed::{ConnectionStatus, DataSource, FeedUpdate, Inbound};
use crate::model::{DriverInfo, SessionInfo, TimingEntry, TrackFlag, WeatherData};
use crate::updater::UpdaterConfig;
use std::collections::BTreeMap;

/// Number of race control messages shown.
pub const RACE_CONTROL_LINES: usize = 3;

static NO_DRIVER: DriverInfo = DriverInfo::EMPTY;

/// What to redraw after an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInstruction {
    /// Connection indicator
    ConnectionStatus(ConnectionStatus),
    /// Data source indicator
    DataSource(DataSource),
    /// Full timing table from state
    TimingTable,
    /// Session panel from state
    SessionPanel,
    /// Weather panel, straight from the payload
    WeatherPanel(WeatherData),
    /// Track status widget
    TrackStatus(TrackFlag),
    /// Race control lines, most recent first
    RaceControl(Vec<String>),
}

/// One row of the timing table: a timing line joined with its driver.
#[derive(Debug, Clone, Copy)]
pub struct TimingRow<'a> {
    /// Car number
    pub number: &'a str,
    /// Merged timing line
    pub timing: &'a TimingEntry,
    /// Driver record, empty if none has arrived
    pub driver: &'a DriverInfo,
}

/// In-memory state of the live view.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    timing: BTreeMap<String, TimingEntry>,
    drivers: BTreeMap<String, DriverInfo>,
    session: Option<SessionInfo>,
}

impl ClientState {
    /// Create empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an inbound message and report what to redraw.
    pub fn apply(&mut self, inbound: Inbound, config: &UpdaterConfig) -> Option<RenderInstruction> {
        match inbound {
            Inbound::Connection(status) => Some(RenderInstruction::ConnectionStatus(status)),
            Inbound::DataSource(source) => Some(RenderInstruction::DataSource(source)),
            Inbound::Feed(update) => self.apply_feed(update, config),
        }
    }

    fn apply_feed(
        &mut self,
        update: FeedUpdate,
        config: &UpdaterConfig,
    ) -> Option<RenderInstruction> {
        match update {
            FeedUpdate::TimingData(data) => {
                for (number, line) in data.lines {
                    self.timing.entry(number).or_default().merge(line);
                }
                Some(RenderInstruction::TimingTable)
            }
            FeedUpdate::DriverList(list) => {
                self.drivers.extend(list.0);
                config
                    .redraw_on_driver_list
                    .then_some(RenderInstruction::TimingTable)
            }
            FeedUpdate::SessionInfo(info) => {
                let redraw = info.is_some();
                self.session = info;
                redraw.then_some(RenderInstruction::SessionPanel)
            }
            FeedUpdate::WeatherData(weather) => weather.map(RenderInstruction::WeatherPanel),
            FeedUpdate::TrackStatus(status) => {
                status.map(|status| RenderInstruction::TrackStatus(status.flag()))
            }
            FeedUpdate::RaceControlMessages(rc) => {
                let messages = rc.messages?;
                let start = messages.len().saturating_sub(RACE_CONTROL_LINES);
                let lines = messages[start..]
                    .iter()
                    .rev()
                    .map(|message| message.message.clone().unwrap_or_default())
                    .collect();
                Some(RenderInstruction::RaceControl(lines))
            }
        }
    }

    /// Timing lines joined with driver records, in table order.
    ///
    /// Ordered by position ascending; lines without a position (or at
    /// position `0`) come last.
    /// Ties fall back to car number, numerically where possible.
    #[must_use]
    pub fn timing_rows(&self) -> Vec<TimingRow<'_>> {
        let mut rows: Vec<TimingRow<'_>> = self
            .timing
            .iter()
            .map(|(number, timing)| TimingRow {
                number,
                timing,
                driver: self.drivers.get(number).unwrap_or(&NO_DRIVER),
            })
            .collect();

        rows.sort_by_key(|row| {
            let position = row.timing.classified_position();
            (
                position.is_none(),
                position,
                row.number.parse::<u32>().unwrap_or(u32::MAX),
                row.number,
            )
        });
        rows
    }

    /// Merged timing line for a car.
    #[must_use]
    pub fn timing(&self, number: &str) -> Option<&TimingEntry> {
        self.timing.get(number)
    }

    /// Driver record for a car.
    #[must_use]
    pub fn driver(&self, number: &str) -> Option<&DriverInfo> {
        self.drivers.get(number)
    }

    /// Current session record.
    #[must_use]
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }
}
