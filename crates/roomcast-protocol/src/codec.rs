//! Turning events into frames and frames into events.
//!
//! The connection handler only needs two operations: encode a
//! [`ServerEvent`] into a text frame and decode a raw inbound frame into a
//! [`ClientEvent`]. [`Codec`] captures exactly that, so a different wire
//! format can be slotted in without touching the handler.

use crate::{ClientEvent, ProtocolError, ServerEvent};

/// Encodes outbound events and decodes inbound frames.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes an outbound event into a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode(&self, event: &ServerEvent) -> Result<String, ProtocolError>;

    /// Parses one inbound frame.
    ///
    /// # Errors
    /// - [`ProtocolError::InvalidMessage`] for empty or non-UTF-8 frames
    /// - [`ProtocolError::Decode`] when the payload is not a known event
    fn decode(&self, frame: &[u8]) -> Result<ClientEvent, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that speaks one JSON object per frame.
///
/// ```rust
/// use roomcast_protocol::{ClientEvent, Codec, JsonCodec, RoomId};
///
/// let codec = JsonCodec;
/// let event = codec
///     .decode(br#"{"event":"join game","username":"alice","roomId":"r1"}"#)
///     .unwrap();
/// assert_eq!(
///     event,
///     ClientEvent::Join { username: "alice".into(), room_id: RoomId::from("r1") }
/// );
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, event: &ServerEvent) -> Result<String, ProtocolError> {
        serde_json::to_string(event).map_err(ProtocolError::Encode)
    }

    fn decode(&self, frame: &[u8]) -> Result<ClientEvent, ProtocolError> {
        let text = std::str::from_utf8(frame).map_err(|_| {
            ProtocolError::InvalidMessage("frame is not valid UTF-8".into())
        })?;
        if text.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage("empty frame".into()));
        }
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use roomcast_transport::ConnectionId;

    use super::*;

    #[test]
    fn test_decode_move_frame() {
        let event = JsonCodec
            .decode(br#"{"event":"player move","x":10,"y":20}"#)
            .unwrap();
        assert_eq!(event, ClientEvent::Move { x: 10, y: 20 });
    }

    #[test]
    fn test_decode_empty_frame_is_invalid_message() {
        let result = JsonCodec.decode(b"   ");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_decode_non_utf8_is_invalid_message() {
        let result = JsonCodec.decode(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_fractional_coordinate_is_rejected() {
        let result = JsonCodec.decode(br#"{"event":"player move","x":1.5,"y":2}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_produces_tagged_object() {
        let text = JsonCodec
            .encode(&ServerEvent::PlayerMoved {
                id: ConnectionId::new(1),
                username: "alice".into(),
                x: 1,
                y: 2,
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["event"], "player moved");
        assert_eq!(value["x"], 1);
    }
}
