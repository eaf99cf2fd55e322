//! Agent configuration.

use anyhow::{bail, Context, Result};
use f1_live_adapter_phoenix::PhoenixSocketConfig;
use f1_live_core::UpdaterConfig;
use f1_live_proto::DEFAULT_TOPIC;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Socket connection settings
    pub socket: PhoenixSocketConfig,

    /// Topic to join
    pub topic: String,

    /// Payload sent with the join
    pub join_payload: Value,

    /// Where to write the rendered page after each update
    pub snapshot_path: Option<PathBuf>,

    /// Updater behavior
    pub updater: UpdaterConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            socket: PhoenixSocketConfig::default(),
            topic: DEFAULT_TOPIC.to_string(),
            join_payload: Value::Object(serde_json::Map::new()),
            snapshot_path: None,
            updater: UpdaterConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `F1LIVE_SOCKET_URL`: Socket endpoint
    /// - `F1LIVE_TOPIC`: Topic to join
    /// - `F1LIVE_SOCKET_PARAMS`: JSON object of connect query parameters
    /// - `F1LIVE_HEARTBEAT_SECS`: Heartbeat interval in seconds
    /// - `F1LIVE_SNAPSHOT_PATH`: File to write the rendered page to
    /// - `F1LIVE_REDRAW_ON_DRIVER_LIST`: Redraw the timing table on driver list updates
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("F1LIVE_SOCKET_URL") {
            config.socket.endpoint = url;
        }

        if let Some(topic) = lookup("F1LIVE_TOPIC") {
            if topic.trim().is_empty() {
                bail!("F1LIVE_TOPIC must not be empty");
            }
            config.topic = topic;
        }

        if let Some(params) = lookup("F1LIVE_SOCKET_PARAMS") {
            config.socket.params = parse_params(&params).context("Invalid F1LIVE_SOCKET_PARAMS")?;
        }

        if let Some(secs) = lookup("F1LIVE_HEARTBEAT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .context("Invalid F1LIVE_HEARTBEAT_SECS")?;
            if secs == 0 {
                bail!("F1LIVE_HEARTBEAT_SECS must be positive");
            }
            config.socket.heartbeat_interval = Duration::from_secs(secs);
        }

        if let Some(path) = lookup("F1LIVE_SNAPSHOT_PATH") {
            if !path.is_empty() {
                config.snapshot_path = Some(PathBuf::from(path));
            }
        }

        if let Some(flag) = lookup("F1LIVE_REDRAW_ON_DRIVER_LIST") {
            config.updater.redraw_on_driver_list =
                parse_bool(&flag).context("Invalid F1LIVE_REDRAW_ON_DRIVER_LIST")?;
        }

        Ok(config)
    }
}

/// Parse a JSON object of scalar values into query parameters.
fn parse_params(json: &str) -> Result<Vec<(String, String)>> {
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(json).context("expected a JSON object")?;

    object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => bail!("parameter '{key}' must be a scalar, got {other}"),
            };
            Ok((key, value))
        })
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}
