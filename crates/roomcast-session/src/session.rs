//! The per-connection session record.

use roomcast_protocol::{ConnectionId, RoomId};

/// What the server remembers about one live connection.
///
/// A session starts empty on connect and gains a room and display name on
/// `join`. It holds identifiers only: the room itself lives in the room
/// store and is always looked up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub room_id: Option<RoomId>,
    pub display_name: Option<String>,
}

/// Where a live connection sits in its lifecycle.
///
/// ```text
///   Connected ──(join)──→ InRoom ──(join again)──→ InRoom (new room)
///       │                    │
///       └────(disconnect)────┴──→ session removed
/// ```
///
/// There is no `Disconnected` variant: a disconnected connection simply
/// has no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    /// Connected but has not joined a room.
    Connected,

    /// Joined `room_id` under `display_name`.
    InRoom {
        room_id: &'a RoomId,
        display_name: &'a str,
    },
}

impl Session {
    /// A fresh session with no room.
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            room_id: None,
            display_name: None,
        }
    }

    pub fn state(&self) -> SessionState<'_> {
        match (&self.room_id, &self.display_name) {
            (Some(room_id), Some(display_name)) => SessionState::InRoom {
                room_id,
                display_name,
            },
            _ => SessionState::Connected,
        }
    }
}
