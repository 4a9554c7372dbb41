//! Room configuration.

use roomcast_protocol::Ball;
use serde::{Deserialize, Serialize};

/// Settings applied to every room the store creates.
///
/// Spawn bounds only decide where a joining member first appears; moves
/// afterwards are not clamped to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// New members spawn at `x` in `[0, spawn_width)`.
    pub spawn_width: i64,

    /// New members spawn at `y` in `[0, spawn_height)`.
    pub spawn_height: i64,

    /// Where the ball sits in a freshly created room.
    pub ball_x: i64,
    pub ball_y: i64,
}

impl RoomConfig {
    /// The ball position for a new room.
    pub fn initial_ball(&self) -> Ball {
        Ball {
            x: self.ball_x,
            y: self.ball_y,
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            spawn_width: 700,
            spawn_height: 500,
            ball_x: 50,
            ball_y: 50,
        }
    }
}
