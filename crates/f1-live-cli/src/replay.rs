//! Replay of recorded channel traffic.

use anyhow::{bail, Context, Result};
use f1_live_core::{ConnectionStatus, Dom, Inbound, Updater};
use f1_live_proto::events::{DATA_SOURCE, F1_UPDATE};
use f1_live_proto::{ChannelMessage, Frame, Reply, ReservedEvent};
use serde_json::Value;
use std::io::BufRead;

/// Counters for one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Lines that produced an updater message
    pub applied: usize,
    /// Lines that carried nothing for the updater
    pub ignored: usize,
    /// Lines that could not be decoded
    pub rejected: usize,
}

/// Apply every line of `reader` to `updater`.
///
/// Undecodable lines are logged and counted, not fatal.
///
/// # Errors
///
/// Returns error if reading fails.
pub fn replay<D: Dom>(reader: impl BufRead, updater: &mut Updater<D>) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        match parse_line(&line) {
            Ok(Some(inbound)) => {
                updater.handle(inbound);
                stats.applied += 1;
            }
            Ok(None) => stats.ignored += 1,
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "Skipping line");
                stats.rejected += 1;
            }
        }
    }

    Ok(stats)
}

/// Parse one log line.
///
/// A line is a V2 frame array, an `{feed, data}` envelope or a `{source}`
/// notice. Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns error if the line is not valid JSON or has an unknown shape.
pub fn parse_line(line: &str) -> Result<Option<Inbound>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('[') {
        let frame = Frame::decode(line)?;
        return frame_inbound(frame);
    }

    let value: Value = serde_json::from_str(line).context("Invalid JSON")?;
    let event = match &value {
        Value::Object(map) if map.contains_key("feed") => F1_UPDATE,
        Value::Object(map) if map.contains_key("source") => DATA_SOURCE,
        _ => bail!("expected a frame, a feed envelope or a source notice"),
    };
    Ok(ChannelMessage::classify(event, value)?)
}

fn frame_inbound(frame: Frame) -> Result<Option<Inbound>> {
    match frame.reserved_event() {
        // Only the join reply echoes the join ref as its message ref.
        Some(ReservedEvent::Reply) if frame.join_ref.is_some() && frame.join_ref == frame.msg_ref => {
            let status = if Reply::parse(&frame.payload)?.is_ok() {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::Disconnected
            };
            Ok(Some(Inbound::Connection(status)))
        }
        Some(_) => Ok(None),
        None => Ok(ChannelMessage::classify(&frame.event, frame.payload)?),
    }
}
