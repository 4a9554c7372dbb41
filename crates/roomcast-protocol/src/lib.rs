//! Wire protocol for roomcast.
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Member`], [`GameState`],
//!   [`RoomId`], [`PlayerId`], [`Recipient`]) — what travels on the wire and
//!   what the room core shares with clients.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events become frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (frames) → Protocol (events) → Room core (sessions, rooms)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use roomcast_transport::ConnectionId;
pub use types::{
    Ball, ClientEvent, GameState, Member, PlayerId, Recipient, RoomId,
    ServerEvent,
};
