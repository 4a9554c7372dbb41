//! # roomcast
//!
//! Real-time multiplayer room server.
//!
//! Clients connect over WebSocket, join named rooms under a display name,
//! and report positions. Every member of a room sees joins, moves and
//! departures in the order the server processed them. Rooms exist only
//! while they have members. Clients can also register an account through
//! a pluggable [`CredentialStore`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomcast::prelude::*;
//!
//! # async fn start() -> Result<(), RoomcastError> {
//! roomcast::init_tracing();
//! let server = RoomcastServer::builder()
//!     .config(ServerConfig::from_env()?)
//!     .build(MemoryCredentialStore::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod actor;
mod config;
mod error;
mod handler;
mod hub;
mod router;
mod server;

pub use actor::CoreHandle;
pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::RoomcastError;
pub use hub::Outlet;
pub use router::{Effect, Router};
pub use server::{RoomcastServer, RoomcastServerBuilder};

pub use roomcast_protocol::{
    ClientEvent, ConnectionId, GameState, Member, PlayerId, Recipient, RoomId,
    ServerEvent,
};
pub use roomcast_room::RoomConfig;
pub use roomcast_session::{CredentialError, CredentialStore, MemoryCredentialStore};

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that logs to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub mod prelude {
    pub use crate::{
        ClientEvent, CoreHandle, CredentialError, CredentialStore,
        MemoryCredentialStore, PlayerId, RoomConfig, RoomId, RoomcastError,
        RoomcastServer, RoomcastServerBuilder, ServerConfig, ServerEvent,
    };
}
