//! A single room: its members and shared game state.
//!
//! The member list is stored once, as `GameState::players`. Everything
//! that needs "the members" reads that vector, so the list sent in
//! `player joined` and the one inside `gameState` can never disagree.
//!
//! Lookups by connection are linear scans. Rooms hold a handful of
//! players, and the scan keeps member order stable for clients.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use roomcast_protocol::{ConnectionId, GameState, Member, RoomId};

use crate::{RoomConfig, RoomError};

/// What a join produces: the new member plus the full snapshot that is
/// broadcast to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub member: Member,
    pub players: Vec<Member>,
    pub game_state: GameState,
}

#[derive(Debug, Clone)]
pub struct Room {
    room_id: RoomId,
    state: GameState,
    spawn_width: i64,
    spawn_height: i64,
}

impl Room {
    /// An empty room with the ball at the configured start position.
    pub fn new(room_id: RoomId, config: &RoomConfig) -> Self {
        Self {
            room_id,
            state: GameState::new(config.initial_ball()),
            spawn_width: config.spawn_width,
            spawn_height: config.spawn_height,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Members in join order.
    pub fn members(&self) -> &[Member] {
        &self.state.players
    }

    pub fn member_count(&self) -> usize {
        self.state.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.players.is_empty()
    }

    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    pub fn scores(&self) -> &BTreeMap<String, i64> {
        &self.state.scores
    }

    /// Finds the first member entry for a connection.
    pub fn member(&self, connection_id: ConnectionId) -> Option<&Member> {
        self.state.players.iter().find(|m| m.id == connection_id)
    }

    /// Appends a member at a random spawn point and gives it a zero score.
    pub fn add_member(
        &mut self,
        connection_id: ConnectionId,
        display_name: &str,
    ) -> JoinOutcome {
        let mut rng = rand::rng();
        let x = spawn_coordinate(&mut rng, self.spawn_width);
        let y = spawn_coordinate(&mut rng, self.spawn_height);
        self.add_member_at(connection_id, display_name, x, y)
    }

    /// Same as [`add_member`](Self::add_member) with a fixed spawn point.
    ///
    /// Joining twice from one connection appends a second entry; nothing
    /// here deduplicates.
    pub fn add_member_at(
        &mut self,
        connection_id: ConnectionId,
        display_name: &str,
        x: i64,
        y: i64,
    ) -> JoinOutcome {
        let member = Member {
            id: connection_id,
            username: display_name.to_string(),
            x,
            y,
        };
        self.state.players.push(member.clone());
        self.state.scores.insert(display_name.to_string(), 0);

        tracing::info!(
            room_id = %self.room_id,
            %connection_id,
            username = display_name,
            players = self.state.players.len(),
            "player joined"
        );

        JoinOutcome {
            member,
            players: self.state.players.clone(),
            game_state: self.state.clone(),
        }
    }

    /// Moves the connection's member to `(x, y)`.
    ///
    /// # Errors
    /// [`RoomError::MemberNotFound`] if the connection has no entry here.
    pub fn update_position(
        &mut self,
        connection_id: ConnectionId,
        x: i64,
        y: i64,
    ) -> Result<&Member, RoomError> {
        let member = self
            .state
            .players
            .iter_mut()
            .find(|m| m.id == connection_id)
            .ok_or_else(|| {
                RoomError::MemberNotFound(connection_id, self.room_id.clone())
            })?;
        member.x = x;
        member.y = y;
        Ok(member)
    }

    /// Removes every entry for the connection and returns who is left.
    ///
    /// Each name the connection held here (every removed entry, plus
    /// `display_name`) loses its score unless a remaining member still
    /// uses it, so `scores` keeps exactly one key per distinct member name.
    pub fn remove_member(
        &mut self,
        connection_id: ConnectionId,
        display_name: &str,
    ) -> Vec<Member> {
        let mut released: BTreeSet<String> = BTreeSet::new();
        released.insert(display_name.to_string());
        self.state.players.retain(|m| {
            if m.id == connection_id {
                released.insert(m.username.clone());
                false
            } else {
                true
            }
        });

        for name in &released {
            let still_used = self.state.players.iter().any(|m| &m.username == name);
            if !still_used {
                self.state.scores.remove(name);
            }
        }

        tracing::info!(
            room_id = %self.room_id,
            %connection_id,
            username = display_name,
            names = released.len(),
            players = self.state.players.len(),
            "player left"
        );

        self.state.players.clone()
    }
}

fn spawn_coordinate(rng: &mut impl Rng, bound: i64) -> i64 {
    if bound > 0 { rng.random_range(0..bound) } else { 0 }
}
