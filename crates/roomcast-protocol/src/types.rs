//! Wire types for roomcast.
//!
//! Every frame on the wire is a single JSON object tagged with an `event`
//! field. Event names keep the spelling browser clients already use
//! (`"join game"`, `"player moved"`, ...), and field names are camelCase.

use std::collections::BTreeMap;
use std::fmt;

use roomcast_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The persistent account id handed out by the credential store when a
/// player registers. Unrelated to [`ConnectionId`], which only lives as
/// long as one socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A client-chosen room name.
///
/// Rooms are addressed by whatever string the first joiner picked; there
/// is no allocation step. Serialized as the bare string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Shared game state
// ---------------------------------------------------------------------------

/// One occupant of a room and its last reported position.
///
/// Positions are whatever the client last sent; they are never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: ConnectionId,
    pub username: String,
    pub x: i64,
    pub y: i64,
}

/// Position of the room's shared ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    pub x: i64,
    pub y: i64,
}

/// The per-room state that is sent to clients on every join.
///
/// `players` is the room's member list itself, not a copy kept alongside
/// it. `scores` is keyed by username and holds exactly the usernames of
/// the current players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Member>,
    pub ball: Ball,
    pub scores: BTreeMap<String, i64>,
}

impl GameState {
    /// An empty state with the ball at the given position.
    pub fn new(ball: Ball) -> Self {
        Self {
            players: Vec::new(),
            ball,
            scores: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Which connections an outbound event is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection subscribed to the room, sender included.
    Room(RoomId),

    /// Every connection subscribed to the room except `except`.
    RoomExcept {
        room_id: RoomId,
        except: ConnectionId,
    },
}

impl Recipient {
    /// The room whose broadcast group this recipient targets.
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::Room(room_id) | Self::RoomExcept { room_id, .. } => room_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// Join (or create) a room under a display name.
    #[serde(rename = "join game", rename_all = "camelCase")]
    Join { username: String, room_id: RoomId },

    /// Report a new position for the sender.
    #[serde(rename = "player move")]
    Move { x: i64, y: i64 },

    /// Create an account. Both fields are optional on the wire so a
    /// missing one can be answered with a 400 instead of a decode error.
    #[serde(rename = "register")]
    Register {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },

    /// Keep-alive; resets the idle timer and is answered with
    /// [`ServerEvent::HeartbeatAck`].
    #[serde(rename = "heartbeat", rename_all = "camelCase")]
    Heartbeat { client_time: u64 },
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// Sent to the whole room, joiner included.
    #[serde(rename = "player joined", rename_all = "camelCase")]
    PlayerJoined {
        username: String,
        players: Vec<Member>,
        game_state: GameState,
    },

    /// Sent to everyone in the room except the mover.
    #[serde(rename = "player moved")]
    PlayerMoved {
        id: ConnectionId,
        username: String,
        x: i64,
        y: i64,
    },

    /// Sent to the members left behind after a disconnect.
    #[serde(rename = "player left")]
    PlayerLeft {
        id: ConnectionId,
        username: String,
        players: Vec<Member>,
    },

    /// Registration succeeded.
    #[serde(rename = "registered", rename_all = "camelCase")]
    Registered {
        status: u16,
        message: String,
        player_id: PlayerId,
    },

    #[serde(rename = "heartbeat ack", rename_all = "camelCase")]
    HeartbeatAck { client_time: u64, server_time: u64 },

    /// A request from this connection failed. `code` follows HTTP
    /// conventions (400 bad request, 500 server failure).
    #[serde(rename = "error")]
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================
