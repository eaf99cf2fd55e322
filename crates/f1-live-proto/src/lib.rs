//! # F1 Live Protocol
//!
//! Phoenix Channels wire format and the feed events carried over it.
//!
//! ## Frames
//!
//! The V2 JSON serializer sends every message as a five-element array:
//! `[join_ref, ref, topic, event, payload]`.
//!
//! ## Events
//!
//! - `phx_join` / `phx_reply`: join handshake and replies to pushes
//! - `heartbeat` on topic `phoenix`: keeps the socket alive
//! - `f1_update`: `{ feed, data }` feed updates
//! - `data_source`: `{ source }` live/simulator notices

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod events;
pub mod frame;
pub mod messages;

pub use events::{ReservedEvent, DEFAULT_TOPIC, PROTOCOL_VSN};
pub use frame::{Frame, RefCounter};
pub use messages::{ChannelMessage, MessageError, Reply, ReplyStatus};
