//! # Phoenix Adapter
//!
//! Websocket transport for Phoenix Channels.
//!
//! ## Connection lifecycle
//!
//! 1. Connect to `{endpoint}/websocket?vsn=2.0.0`
//! 2. Send `phx_join` for the topic and wait for the matching `phx_reply`
//! 3. Forward pushes on the topic; send a heartbeat every interval
//! 4. When the socket drops, wait out the reconnect schedule, reconnect
//!    and join again
//!
//! Events are delivered over a bounded channel; dropping the receiver stops
//! the transport.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod endpoint;
pub mod events;
pub mod subscriber;

pub use endpoint::socket_url;
pub use events::ChannelEvent;
pub use subscriber::{PhoenixSocketConfig, PhoenixSubscriber, SubscriberError};
