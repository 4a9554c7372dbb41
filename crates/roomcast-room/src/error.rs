//! Error types for the room layer.

use roomcast_protocol::{ConnectionId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist in the store.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The connection has no member entry in this room. Usually a move
    /// that raced a disconnect; callers drop it.
    #[error("{0} is not a member of room {1}")]
    MemberNotFound(ConnectionId, RoomId),
}
