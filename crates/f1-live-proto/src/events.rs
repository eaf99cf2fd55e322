//! Topic and event names.

/// Serializer version negotiated in the socket URL.
pub const PROTOCOL_VSN: &str = "2.0.0";

/// Topic the live feed is published on.
pub const DEFAULT_TOPIC: &str = "f1:live";

/// Topic used for socket-level heartbeats.
pub const PHOENIX_TOPIC: &str = "phoenix";

/// Application event carrying `{ feed, data }`.
pub const F1_UPDATE: &str = "f1_update";

/// Application event carrying `{ source }`.
pub const DATA_SOURCE: &str = "data_source";

/// Events reserved by the channel protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedEvent {
    /// Join request
    Join,
    /// Reply to a push
    Reply,
    /// Channel crashed on the server
    Error,
    /// Channel closed by the server
    Close,
    /// Leave request
    Leave,
    /// Socket keep-alive
    Heartbeat,
}

impl ReservedEvent {
    /// Parse an event name. Application events return `None`.
    #[must_use]
    pub fn parse(event: &str) -> Option<Self> {
        match event {
            "phx_join" => Some(Self::Join),
            "phx_reply" => Some(Self::Reply),
            "phx_error" => Some(Self::Error),
            "phx_close" => Some(Self::Close),
            "phx_leave" => Some(Self::Leave),
            "heartbeat" => Some(Self::Heartbeat),
            _ => None,
        }
    }

    /// Event name on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Join => "phx_join",
            Self::Reply => "phx_reply",
            Self::Error => "phx_error",
            Self::Close => "phx_close",
            Self::Leave => "phx_leave",
            Self::Heartbeat => "heartbeat",
        }
    }
}
