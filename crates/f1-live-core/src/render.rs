//! HTML fragments for each page region.
//!
//! Renderers are pure: they read state and return markup. Every call produces
//! the full contents of its region.

use crate::dom::ElementId;
use crate::feed::{ConnectionStatus, DataSource};
use crate::format::{self, CLOCK_PLACEHOLDER, PLACEHOLDER};
use crate::model::{SessionInfo, TimedValue, TrackFlag, WeatherData};
use crate::state::{ClientState, RenderInstruction, TimingRow};
use std::fmt::Write as _;

/// Columns in the timing table.
pub const TIMING_COLUMNS: usize = 11;

/// Text colour of a fastest-lap highlight.
const FASTEST_CLASS: &str = "text-purple-400";

/// Text colour of a personal-best sector.
const PERSONAL_BEST_CLASS: &str = "text-green-400";

/// Rendered contents for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Region to write
    pub target: ElementId,
    /// Full inner HTML of the region
    pub html: String,
}

/// Render the region named by `instruction`.
#[must_use]
pub fn render(state: &ClientState, instruction: &RenderInstruction) -> Fragment {
    let (target, html) = match instruction {
        RenderInstruction::ConnectionStatus(status) => {
            (ElementId::ConnectionStatus, connection_status(*status))
        }
        RenderInstruction::DataSource(source) => (ElementId::DataSource, data_source(*source)),
        RenderInstruction::TimingTable => (ElementId::TimingTableBody, timing_table(state)),
        RenderInstruction::SessionPanel => (ElementId::SessionInfo, session_panel(state.session())),
        RenderInstruction::WeatherPanel(weather) => (ElementId::WeatherData, weather_panel(weather)),
        RenderInstruction::TrackStatus(flag) => (ElementId::TrackStatus, track_status(*flag)),
        RenderInstruction::RaceControl(lines) => (ElementId::RaceControl, race_control(lines)),
    };
    Fragment { target, html }
}

/// Connection indicator.
#[must_use]
pub fn connection_status(status: ConnectionStatus) -> String {
    match status {
        ConnectionStatus::Connected => concat!(
            "<div class=\"w-2 h-2 bg-green-500 rounded-full mr-2 animate-pulse\"></div>",
            "<span class=\"text-sm text-gray-400\">Connected</span>"
        )
        .to_string(),
        ConnectionStatus::Disconnected => concat!(
            "<div class=\"w-2 h-2 bg-red-500 rounded-full mr-2\"></div>",
            "<span class=\"text-sm text-gray-400\">Disconnected</span>"
        )
        .to_string(),
    }
}

/// Live/simulator indicator.
#[must_use]
pub fn data_source(source: DataSource) -> String {
    let (color, label) = match source {
        DataSource::Live => ("bg-green-500", "Live Data"),
        DataSource::Simulator => ("bg-yellow-500", "Simulator"),
    };
    format!(
        "<div class=\"w-2 h-2 {color} rounded-full mr-2\"></div>\
         <span class=\"text-sm text-gray-400\">{label}</span>"
    )
}

/// Session panel. Absent fields show placeholders.
#[must_use]
pub fn session_panel(session: Option<&SessionInfo>) -> String {
    let track = session
        .and_then(|s| s.meeting.as_ref())
        .and_then(|m| m.name.as_deref());
    let name = session.and_then(|s| s.name.as_deref());
    let remaining = session.and_then(|s| s.remaining_time.as_deref());

    format!(
        "<h2 class=\"text-xl font-semibold mb-4\">Session Information</h2>\
         <div class=\"grid grid-cols-1 md:grid-cols-3 gap-4\">\
         {}{}{}</div>",
        session_field("Track", &format::text(track)),
        session_field("Session", &format::text(name)),
        session_field(
            "Time Remaining",
            &format::text_or(remaining, CLOCK_PLACEHOLDER)
        ),
    )
}

fn session_field(label: &str, value: &str) -> String {
    format!(
        "<div><p class=\"text-gray-400 text-sm\">{label}</p>\
         <p class=\"text-lg font-medium\">{value}</p></div>"
    )
}

/// Weather panel.
#[must_use]
pub fn weather_panel(weather: &WeatherData) -> String {
    let mut out = String::new();
    for (label, value, unit) in [
        ("Track Temp", weather.track_temp.as_deref(), "°C"),
        ("Air Temp", weather.air_temp.as_deref(), "°C"),
        ("Wind Speed", weather.wind_speed.as_deref(), " km/h"),
    ] {
        let _ = write!(
            out,
            "<div class=\"flex justify-between\">\
             <span class=\"text-gray-400\">{label}</span>\
             <span>{}{unit}</span></div>",
            format::text(value)
        );
    }
    out
}

/// Track status widget.
#[must_use]
pub fn track_status(flag: TrackFlag) -> String {
    format!(
        "<div class=\"flex items-center\">\
         <div class=\"w-4 h-4 bg-{}-500 rounded mr-2\"></div>\
         <span>{}</span></div>",
        flag.color(),
        flag.label()
    )
}

/// Race control lines, already ordered newest first.
#[must_use]
pub fn race_control(lines: &[String]) -> String {
    if lines.is_empty() {
        return "<p class=\"text-gray-400\">No messages</p>".to_string();
    }

    let mut out = String::new();
    for line in lines {
        let _ = write!(
            out,
            "<p class=\"text-gray-300\">{}</p>",
            format::escape(line)
        );
    }
    out
}

/// Timing table body.
#[must_use]
pub fn timing_table(state: &ClientState) -> String {
    let rows = state.timing_rows();
    if rows.is_empty() {
        return format!(
            "<tr><td colspan=\"{TIMING_COLUMNS}\" class=\"px-4 py-8 text-center text-gray-500\">\
             Waiting for timing data...</td></tr>"
        );
    }

    let mut out = String::new();
    for row in &rows {
        timing_row(&mut out, row);
    }
    out
}

fn timing_row(out: &mut String, row: &TimingRow<'_>) {
    let timing = row.timing;
    let last_lap = timing.last_lap_time.as_ref();
    let best_lap = timing.best_lap_time.as_ref();
    let tyre = timing.tyre.as_ref();
    let compound = tyre.and_then(|t| t.compound.as_ref());

    out.push_str("<tr class=\"hover:bg-gray-700 transition-colors\">");
    cell(out, "font-medium", &format::count(timing.classified_position()));

    let _ = write!(
        out,
        "<td class=\"px-4 py-3\"><div class=\"flex items-center\">\
         <span class=\"font-medium mr-2\">{}</span>\
         <span class=\"text-gray-400 text-sm\">{}</span></div></td>",
        format::text_or(row.driver.tla.as_deref(), row.number),
        format::text_or(row.driver.full_name.as_deref(), ""),
    );

    cell(out, "", &format::text_or(timing.gap_to_leader.as_deref(), ""));
    cell(
        out,
        "",
        &format::text_or(
            timing
                .interval_to_position_ahead
                .as_ref()
                .and_then(|i| i.value.as_deref()),
            "",
        ),
    );
    cell(
        out,
        highlight(last_lap.is_some_and(|lap| lap.personal_fastest)),
        &format::text(last_lap.and_then(|lap| lap.value.as_deref())),
    );
    cell(
        out,
        highlight(best_lap.is_some_and(|lap| lap.overall_fastest)),
        &format::text(best_lap.and_then(|lap| lap.value.as_deref())),
    );
    for index in 0..3 {
        let sector = timing.sector(index);
        cell(
            out,
            sector_class(sector),
            &format::text(sector.and_then(|s| s.value.as_deref())),
        );
    }

    let _ = write!(
        out,
        "<td class=\"px-4 py-3\"><span class=\"px-2 py-1 text-xs rounded {}\">{}</span></td>",
        compound.map_or("bg-gray-700", |c| c.badge_class()),
        format::text(compound.map(|c| c.as_str())),
    );
    cell(out, "", &format::count(tyre.and_then(|t| t.total_laps)));
    out.push_str("</tr>");
}

fn cell(out: &mut String, class: &str, content: &str) {
    if class.is_empty() {
        let _ = write!(out, "<td class=\"px-4 py-3\">{content}</td>");
    } else {
        let _ = write!(out, "<td class=\"px-4 py-3 {class}\">{content}</td>");
    }
}

fn highlight(on: bool) -> &'static str {
    if on {
        FASTEST_CLASS
    } else {
        ""
    }
}

/// Colour class of a sector cell.
#[must_use]
pub fn sector_class(sector: Option<&TimedValue>) -> &'static str {
    match sector {
        Some(sector) if sector.overall_fastest => FASTEST_CLASS,
        Some(sector) if sector.personal_fastest => PERSONAL_BEST_CLASS,
        _ => "",
    }
}
