//! V2 JSON frames.

use crate::events::{ReservedEvent, PHOENIX_TOPIC};
use crate::messages::MessageError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One channel message.
///
/// Serialized as `[join_ref, ref, topic, event, payload]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Ref of the join this message belongs to
    pub join_ref: Option<String>,
    /// Ref used to match replies to pushes
    pub msg_ref: Option<String>,
    /// Channel topic
    pub topic: String,
    /// Event name
    pub event: String,
    /// Event payload
    pub payload: Value,
}

impl Frame {
    /// Create a frame.
    #[must_use]
    pub fn new(
        join_ref: Option<String>,
        msg_ref: Option<String>,
        topic: impl Into<String>,
        event: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            join_ref,
            msg_ref,
            topic: topic.into(),
            event: event.into(),
            payload,
        }
    }

    /// Join request. The join ref doubles as the message ref.
    #[must_use]
    pub fn join(join_ref: String, topic: impl Into<String>, payload: Value) -> Self {
        Self::new(
            Some(join_ref.clone()),
            Some(join_ref),
            topic,
            ReservedEvent::Join.as_str(),
            payload,
        )
    }

    /// Leave request for a joined topic.
    #[must_use]
    pub fn leave(join_ref: String, msg_ref: String, topic: impl Into<String>) -> Self {
        Self::new(
            Some(join_ref),
            Some(msg_ref),
            topic,
            ReservedEvent::Leave.as_str(),
            Value::Object(serde_json::Map::new()),
        )
    }

    /// Socket heartbeat.
    #[must_use]
    pub fn heartbeat(msg_ref: String) -> Self {
        Self::new(
            None,
            Some(msg_ref),
            PHOENIX_TOPIC,
            ReservedEvent::Heartbeat.as_str(),
            Value::Object(serde_json::Map::new()),
        )
    }

    /// Server push with no refs.
    #[must_use]
    pub fn push(topic: impl Into<String>, event: impl Into<String>, payload: Value) -> Self {
        Self::new(None, None, topic, event, payload)
    }

    /// Reserved event of this frame, if any.
    #[must_use]
    pub fn reserved_event(&self) -> Option<ReservedEvent> {
        ReservedEvent::parse(&self.event)
    }

    /// Encode to the JSON text sent on the socket.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn encode(&self) -> Result<String, MessageError> {
        serde_json::to_string(self).map_err(|e| MessageError::Serialize(e.to_string()))
    }

    /// Decode JSON text received from the socket.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a five-element frame.
    pub fn decode(text: &str) -> Result<Self, MessageError> {
        serde_json::from_str(text).map_err(|e| MessageError::Deserialize(e.to_string()))
    }
}

impl Serialize for Frame {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (
            &self.join_ref,
            &self.msg_ref,
            &self.topic,
            &self.event,
            &self.payload,
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Frame {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (join_ref, msg_ref, topic, event, payload) =
            <(Option<String>, Option<String>, String, String, Value)>::deserialize(deserializer)?;
        Ok(Self {
            join_ref,
            msg_ref,
            topic,
            event,
            payload,
        })
    }
}

/// Monotonic message ref generator, one per socket connection.
#[derive(Debug, Clone, Default)]
pub struct RefCounter {
    last: u64,
}

impl RefCounter {
    /// Next ref, starting at `"1"`.
    pub fn next_ref(&mut self) -> String {
        self.last = self.last.wrapping_add(1);
        self.last.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_frame_encoding() {
        let frame = Frame::join("1".to_string(), "f1:live", json!({}));
        assert_eq!(
            frame.encode().unwrap(),
            r#"["1","1","f1:live","phx_join",{}]"#
        );
    }

    #[test]
    fn heartbeat_frame_encoding() {
        let frame = Frame::heartbeat("7".to_string());
        assert_eq!(
            frame.encode().unwrap(),
            r#"[null,"7","phoenix","heartbeat",{}]"#
        );
    }

    #[test]
    fn decode_server_push() {
        let frame = Frame::decode(
            r#"[null,null,"f1:live","f1_update",{"feed":"TrackStatus","data":{"Status":"2"}}]"#,
        )
        .unwrap();

        assert_eq!(frame.join_ref, None);
        assert_eq!(frame.msg_ref, None);
        assert_eq!(frame.topic, "f1:live");
        assert_eq!(frame.event, "f1_update");
        assert_eq!(frame.payload["feed"], "TrackStatus");
        assert_eq!(frame.reserved_event(), None);
    }

    #[test]
    fn decode_reply() {
        let frame = Frame::decode(
            r#"["1","1","f1:live","phx_reply",{"status":"ok","response":{}}]"#,
        )
        .unwrap();
        assert_eq!(frame.reserved_event(), Some(ReservedEvent::Reply));
        assert_eq!(frame.msg_ref.as_deref(), Some("1"));
    }

    #[test]
    fn decode_rejects_object_form() {
        let err = Frame::decode(r#"{"topic":"f1:live","event":"phx_reply"}"#).unwrap_err();
        assert!(matches!(err, MessageError::Deserialize(_)));
    }

    #[test]
    fn refs_are_monotonic() {
        let mut refs = RefCounter::default();
        assert_eq!(refs.next_ref(), "1");
        assert_eq!(refs.next_ref(), "2");
    }
}
