//! The room store: every live room, keyed by name.
//!
//! Invariant: a room is in the store if and only if it has at least one
//! member. Rooms appear on the first join and disappear in the same call
//! that removes their last member ([`RoomStore::depart`]), so nothing ever
//! observes an empty room.

use std::collections::HashMap;

use roomcast_protocol::{ConnectionId, Member, RoomId};

use crate::{Room, RoomConfig, RoomError};

/// Result of removing a member through [`RoomStore::depart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// The room is still alive with these members.
    Remaining(Vec<Member>),

    /// The departing member was the last one; the room has been deleted.
    Closed,
}

/// Owns every [`Room`].
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomId, Room>,
    config: RoomConfig,
}

impl RoomStore {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Returns the room, creating an empty one if it does not exist.
    ///
    /// The caller is expected to add a member right away; an empty room
    /// left behind here would break the store invariant.
    pub fn get_or_create(&mut self, room_id: &RoomId) -> &mut Room {
        let config = &self.config;
        self.rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!(%room_id, "room created");
            Room::new(room_id.clone(), config)
        })
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Moves a member of `room_id`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no such room
    /// - [`RoomError::MemberNotFound`] — the connection is not in it
    pub fn move_member(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        x: i64,
        y: i64,
    ) -> Result<&Member, RoomError> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?
            .update_position(connection_id, x, y)
    }

    /// Deletes the room if it has no members. Returns `true` if deleted.
    pub fn remove_if_empty(&mut self, room_id: &RoomId) -> bool {
        let empty = self.rooms.get(room_id).is_some_and(Room::is_empty);
        if empty {
            self.rooms.remove(room_id);
            tracing::info!(%room_id, "room closed");
        }
        empty
    }

    /// Removes a member and, in the same step, deletes the room if that
    /// left it empty.
    ///
    /// Returns `None` if the room does not exist.
    pub fn depart(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        display_name: &str,
    ) -> Option<Departure> {
        let remaining = self
            .rooms
            .get_mut(room_id)?
            .remove_member(connection_id, display_name);
        if self.remove_if_empty(room_id) {
            Some(Departure::Closed)
        } else {
            Some(Departure::Remaining(remaining))
        }
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Ids of all live rooms, in no particular order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    /// Iterates over all live rooms.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}
