//! # F1 Live Agent
//!
//! Follows the live timing channel and keeps a rendered page current.
//!
//! ## Architecture
//!
//! The agent runs two concurrent tasks:
//! 1. **Transport**: the Phoenix subscriber joins the feed topic, keeps the
//!    socket alive and reconnects after drops
//! 2. **Updater**: applies each channel event to the client state and rewrites
//!    the affected page region, then snapshots the page to disk if configured

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod runtime;
mod snapshot;

pub use config::AgentConfig;
pub use runtime::Agent;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting F1 live agent");

    let config = AgentConfig::from_env()?;

    tracing::info!(
        endpoint = %config.socket.endpoint,
        topic = %config.topic,
        "Agent configured"
    );

    let agent = Agent::new(config)?;

    agent.run().await?;

    Ok(())
}
