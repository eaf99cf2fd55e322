//! Events emitted by the subscriber.

use serde_json::Value;

/// Something that happened on the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Join acknowledged by the server
    Joined {
        /// Join reply body
        response: Value,
    },
    /// Join refused by the server
    JoinRejected {
        /// Reply status as sent
        status: String,
        /// Join reply body
        response: Value,
    },
    /// Application event pushed on the topic
    Push {
        /// Event name
        event: String,
        /// Event payload
        payload: Value,
    },
    /// Socket dropped after being connected; a reconnect follows
    Disconnected,
}
