//! Unified error type for roomcast.

use roomcast_protocol::ProtocolError;
use roomcast_room::RoomError;
use roomcast_session::RegistrationError;
use roomcast_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomcastError {
    /// Binding, accepting or talking to a socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The core actor has stopped; nothing can be routed any more.
    #[error("room core is not running")]
    CoreUnavailable,

    /// Invalid server configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
