//! Rooms and the room store for roomcast.
//!
//! # Key types
//!
//! - [`RoomStore`] — owns every live room; creates on first join, deletes
//!   on last departure
//! - [`Room`] — members plus shared [`GameState`](roomcast_protocol::GameState)
//! - [`RoomConfig`] — spawn bounds and initial ball position
//! - [`Departure`] — what removing a member left behind

mod config;
mod error;
mod room;
mod store;

pub use config::RoomConfig;
pub use error::RoomError;
pub use room::{JoinOutcome, Room};
pub use store::{Departure, RoomStore};
