//! Error types for the protocol layer.

/// Errors that can occur while turning events into frames and back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An outbound event could not be serialized.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An inbound frame is not a valid client event: malformed JSON, an
    /// unknown `event` tag, or missing/mistyped fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame was rejected before decoding (empty, not UTF-8, ...).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
