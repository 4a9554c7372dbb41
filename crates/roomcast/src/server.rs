//! `RoomcastServer` builder and accept loop.
//!
//! This is the entry point for running a roomcast server. It ties the
//! layers together: transport → protocol → session → room core.

use std::sync::Arc;
use std::time::Duration;

use roomcast_protocol::JsonCodec;
use roomcast_room::RoomConfig;
use roomcast_session::{CredentialStore, Registrar};
use roomcast_transport::{Transport, WebSocketTransport};

use crate::actor::CoreHandle;
use crate::handler::handle_connection;
use crate::{RoomcastError, ServerConfig};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S: CredentialStore> {
    pub(crate) core: CoreHandle,
    pub(crate) registrar: Registrar<S>,
    pub(crate) codec: JsonCodec,
    pub(crate) idle_timeout: Option<Duration>,
}

/// Builder for configuring and starting a roomcast server.
///
/// # Example
///
/// ```rust,no_run
/// use roomcast::prelude::*;
///
/// # async fn start() -> Result<(), RoomcastError> {
/// let server = RoomcastServer::builder()
///     .bind("0.0.0.0:3000")
///     .build(MemoryCredentialStore::new())
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RoomcastServerBuilder {
    config: ServerConfig,
}

impl RoomcastServerBuilder {
    /// Creates a new builder with [`ServerConfig::default`].
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the idle timeout; `None` disables it.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Sets the configuration for newly created rooms.
    pub fn room_config(mut self, room: RoomConfig) -> Self {
        self.config.room = room;
        self
    }

    /// Binds the listener and starts the core actor.
    ///
    /// # Errors
    /// - [`RoomcastError::Config`] — `core_channel_size` is zero
    /// - [`RoomcastError::Transport`] — the address could not be bound
    pub async fn build<S: CredentialStore>(
        self,
        store: S,
    ) -> Result<RoomcastServer<S>, RoomcastError> {
        if self.config.core_channel_size == 0 {
            return Err(RoomcastError::Config(
                "core_channel_size must be at least 1".into(),
            ));
        }

        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let core =
            CoreHandle::spawn(self.config.room, self.config.core_channel_size);

        let state = Arc::new(ServerState {
            core,
            registrar: Registrar::new(store),
            codec: JsonCodec,
            idle_timeout: self.config.idle_timeout,
        });

        Ok(RoomcastServer { transport, state })
    }
}

impl Default for RoomcastServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound roomcast server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RoomcastServer<S: CredentialStore> {
    transport: WebSocketTransport,
    state: Arc<ServerState<S>>,
}

impl RoomcastServer<roomcast_session::MemoryCredentialStore> {
    /// Creates a new builder.
    pub fn builder() -> RoomcastServerBuilder {
        RoomcastServerBuilder::new()
    }
}

impl<S: CredentialStore> RoomcastServer<S> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the room core, for inspecting live rooms.
    pub fn core(&self) -> CoreHandle {
        self.state.core.clone()
    }

    /// The registrar backing `register` events.
    pub fn registrar(&self) -> &Registrar<S> {
        &self.state.registrar
    }

    /// Runs the accept loop.
    ///
    /// Spawns a handler task per accepted connection. Runs until the
    /// process is terminated; accept failures are logged and skipped.
    pub async fn run(mut self) -> Result<(), RoomcastError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "roomcast server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
