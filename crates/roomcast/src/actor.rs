//! Core actor: the single Tokio task that owns all room state.
//!
//! Connection handlers never share the router. They send [`CoreCommand`]s
//! through a bounded channel and the actor handles one command at a time,
//! running the router transition and then the hub effects before taking
//! the next. That sequencing is what gives every room a single, ordered
//! stream of events.

use roomcast_protocol::{ClientEvent, ConnectionId, GameState, RoomId};
use roomcast_room::RoomConfig;
use tokio::sync::{mpsc, oneshot};

use crate::RoomcastError;
use crate::hub::{Hub, Outlet};
use crate::router::Router;

/// Commands sent to the core actor through its channel.
pub(crate) enum CoreCommand {
    /// A connection was accepted; `outlet` delivers its outbound events.
    Connect {
        connection_id: ConnectionId,
        outlet: Outlet,
    },

    /// A decoded room event from a connection.
    Event {
        connection_id: ConnectionId,
        event: ClientEvent,
    },

    /// The connection is gone.
    Disconnect { connection_id: ConnectionId },

    /// Read a room's current game state.
    RoomSnapshot {
        room_id: RoomId,
        reply: oneshot::Sender<Option<GameState>>,
    },

    /// Count live rooms.
    RoomCount { reply: oneshot::Sender<usize> },
}

/// Handle to the running core actor.
///
/// Cheap to clone; every connection handler holds one.
#[derive(Debug, Clone)]
pub struct CoreHandle {
    sender: mpsc::Sender<CoreCommand>,
}

impl CoreHandle {
    /// Spawns the core actor on the current runtime.
    ///
    /// `channel_size` must be non-zero.
    pub fn spawn(config: RoomConfig, channel_size: usize) -> Self {
        let (sender, receiver) = mpsc::channel(channel_size);
        let actor = CoreActor {
            router: Router::new(config),
            hub: Hub::default(),
            receiver,
        };
        tokio::spawn(actor.run());
        Self { sender }
    }

    /// Registers a new connection and its outlet.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        outlet: Outlet,
    ) -> Result<(), RoomcastError> {
        self.send(CoreCommand::Connect {
            connection_id,
            outlet,
        })
        .await
    }

    /// Routes a client event (fire-and-forget).
    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RoomcastError> {
        self.send(CoreCommand::Event {
            connection_id,
            event,
        })
        .await
    }

    /// Reports that a connection has closed.
    pub async fn disconnect(
        &self,
        connection_id: ConnectionId,
    ) -> Result<(), RoomcastError> {
        self.send(CoreCommand::Disconnect { connection_id }).await
    }

    /// Returns the room's game state, or `None` if the room does not exist.
    pub async fn room_snapshot(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<GameState>, RoomcastError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoreCommand::RoomSnapshot {
            room_id: room_id.clone(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| RoomcastError::CoreUnavailable)
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> Result<usize, RoomcastError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoreCommand::RoomCount { reply }).await?;
        rx.await.map_err(|_| RoomcastError::CoreUnavailable)
    }

    async fn send(&self, command: CoreCommand) -> Result<(), RoomcastError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| RoomcastError::CoreUnavailable)
    }
}

/// The actor state. Runs inside a Tokio task.
struct CoreActor {
    router: Router,
    hub: Hub,
    receiver: mpsc::Receiver<CoreCommand>,
}

impl CoreActor {
    /// Processes commands until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("room core started");

        while let Some(command) = self.receiver.recv().await {
            self.handle(command);
        }

        tracing::info!(rooms = self.router.rooms().len(), "room core stopped");
    }

    fn handle(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::Connect {
                connection_id,
                outlet,
            } => {
                self.hub.attach(connection_id, outlet);
                let effects = self.router.connect(connection_id);
                self.hub.apply(effects);
            }
            CoreCommand::Event {
                connection_id,
                event,
            } => {
                let effects = self.router.dispatch(connection_id, event);
                self.hub.apply(effects);
            }
            CoreCommand::Disconnect { connection_id } => {
                let effects = self.router.disconnect(connection_id);
                self.hub.apply(effects);
            }
            CoreCommand::RoomSnapshot { room_id, reply } => {
                let snapshot = self
                    .router
                    .rooms()
                    .get(&room_id)
                    .map(|room| room.game_state().clone());
                let _ = reply.send(snapshot);
            }
            CoreCommand::RoomCount { reply } => {
                let _ = reply.send(self.router.rooms().len());
            }
        }
    }
}
