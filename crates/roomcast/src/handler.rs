//! Per-connection handler: read frames, answer or route them.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Spawn a writer task that drains the connection's outlet
//!   2. Register the connection with the core actor
//!   3. Loop: receive frames, decode, then
//!      - `register` / `heartbeat` → answered here, on the outlet
//!      - `join game` / `player move` → dispatched to the core
//!   4. On exit, the drop guard reports the disconnect

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use roomcast_protocol::{ClientEvent, Codec, ConnectionId, JsonCodec, ServerEvent};
use roomcast_session::{CredentialStore, STATUS_CREATED};
use roomcast_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::RoomcastError;
use crate::actor::CoreHandle;
use crate::hub::Outlet;
use crate::server::ServerState;

/// Drop guard that reports the disconnect when the handler exits.
///
/// This runs even if the handler panics or returns early with an error.
/// `Drop` is synchronous, so the report goes out on a spawned task.
struct DisconnectGuard {
    connection_id: ConnectionId,
    core: CoreHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let connection_id = self.connection_id;
        let core = self.core.clone();
        tokio::spawn(async move {
            if let Err(e) = core.disconnect(connection_id).await {
                tracing::debug!(%connection_id, error = %e, "disconnect not delivered");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S: CredentialStore>(
    conn: WebSocketConnection,
    state: Arc<ServerState<S>>,
) -> Result<(), RoomcastError> {
    let conn = Arc::new(conn);
    let connection_id = conn.id();
    tracing::info!(%connection_id, "client connected");

    let (outlet, outbox) = mpsc::unbounded_channel();
    tokio::spawn(write_loop(Arc::clone(&conn), outbox, state.codec));

    state.core.connect(connection_id, outlet.clone()).await?;
    let _guard = DisconnectGuard {
        connection_id,
        core: state.core.clone(),
    };

    loop {
        let received = match state.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, conn.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::info!(%connection_id, "connection idle, closing");
                    let _ = conn.close().await;
                    break;
                }
            },
            None => conn.recv().await,
        };

        let data = match received {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%connection_id, "client disconnected");
                break;
            }
            Err(e) => {
                tracing::debug!(%connection_id, error = %e, "recv error");
                break;
            }
        };

        let event = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%connection_id, error = %e, "malformed frame");
                reply(
                    &outlet,
                    ServerEvent::Error {
                        code: 400,
                        message: format!("malformed event: {e}"),
                    },
                );
                continue;
            }
        };

        match event {
            ClientEvent::Register { username, password } => {
                let response = register(&state, username, password).await;
                reply(&outlet, response);
            }
            ClientEvent::Heartbeat { client_time } => {
                reply(
                    &outlet,
                    ServerEvent::HeartbeatAck {
                        client_time,
                        server_time: unix_millis(),
                    },
                );
            }
            event => state.core.dispatch(connection_id, event).await?,
        }
    }

    // _guard drops here → disconnect reaches the core, which releases the
    // hub's outlet clone; the writer ends once both clones are gone.
    Ok(())
}

/// Encodes outbound events and writes them until the outlet closes or the
/// socket fails.
async fn write_loop(
    conn: Arc<WebSocketConnection>,
    mut outbox: mpsc::UnboundedReceiver<ServerEvent>,
    codec: JsonCodec,
) {
    let connection_id = conn.id();
    while let Some(event) = outbox.recv().await {
        let text = match codec.encode(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%connection_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send_text(&text).await {
            tracing::debug!(%connection_id, error = %e, "send failed, writer stopping");
            break;
        }
    }
}

async fn register<S: CredentialStore>(
    state: &ServerState<S>,
    username: Option<String>,
    password: Option<String>,
) -> ServerEvent {
    match state
        .registrar
        .register(username.as_deref(), password.as_deref())
        .await
    {
        Ok(registration) => ServerEvent::Registered {
            status: STATUS_CREATED,
            message: registration.message,
            player_id: registration.player_id,
        },
        Err(e) => ServerEvent::Error {
            code: e.status_code(),
            message: e.client_message(),
        },
    }
}

/// Queues a reply for this connection only.
fn reply(outlet: &Outlet, event: ServerEvent) {
    if outlet.send(event).is_err() {
        tracing::debug!("writer gone, reply dropped");
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(saturating_millis)
        .unwrap_or_default()
}

/// Whole milliseconds in `d`, clamped to `u64::MAX`.
fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
