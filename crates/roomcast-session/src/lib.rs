//! Sessions and accounts for roomcast.
//!
//! This crate covers the two things a server knows about a client:
//!
//! 1. **Where the connection is** — a [`Session`] per live connection in
//!    the [`SessionRegistry`], holding the room it joined and the name it
//!    joined under.
//! 2. **Who registered** — the [`CredentialStore`] hook and the
//!    [`Registrar`] that validates, hashes and stores new accounts.
//!
//! # How it fits in the stack
//!
//! ```text
//! Event router (above)  ← reads/writes sessions, calls the registrar
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below)  ← ConnectionId, RoomId, PlayerId
//! ```

#![allow(async_fn_in_trait)]

mod credentials;
mod error;
mod registration;
mod registry;
mod session;

pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::{CredentialError, RegistrationError};
pub use registration::{
    Registrar, Registration, STATUS_CREATED, hash_password,
};
pub use registry::SessionRegistry;
pub use session::{Session, SessionState};
