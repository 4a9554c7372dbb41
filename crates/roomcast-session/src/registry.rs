//! The session registry: which connection is in which room.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is a plain `HashMap` with `&mut self` mutators. It is
//! owned by the event router, which lives inside the single core task, so
//! every access is already serialized.

use std::collections::HashMap;

use roomcast_protocol::{ConnectionId, RoomId};

use crate::Session;

/// Tracks one [`Session`] per live connection.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session for a new connection.
    ///
    /// Connection ids are never reused, so an existing entry can only mean
    /// the transport reported the same connect twice; it is left untouched.
    pub fn on_connect(&mut self, connection_id: ConnectionId) -> &Session {
        self.sessions.entry(connection_id).or_insert_with(|| {
            tracing::debug!(%connection_id, "session created");
            Session::new(connection_id)
        })
    }

    /// Records that `connection_id` joined `room_id` as `display_name`.
    ///
    /// Overwrites any earlier association, and creates the session if the
    /// connection was never seen before.
    pub fn set_room(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        display_name: String,
    ) {
        let session = self
            .sessions
            .entry(connection_id)
            .or_insert_with(|| Session::new(connection_id));
        if let Some(previous) = &session.room_id {
            if *previous != room_id {
                tracing::debug!(
                    %connection_id,
                    from = %previous,
                    to = %room_id,
                    "session switched rooms"
                );
            }
        }
        session.room_id = Some(room_id);
        session.display_name = Some(display_name);
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    /// Removes the session and hands back what it held.
    ///
    /// Returns `None` if the connection has no session, which makes a
    /// repeated disconnect a no-op.
    pub fn on_disconnect(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Option<Session> {
        let removed = self.sessions.remove(connection_id);
        if removed.is_some() {
            tracing::debug!(%connection_id, "session removed");
        }
        removed
    }

    /// Returns the number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
