//! Arena: a ready-to-run roomcast server.
//!
//! Reads `PORT` / `ROOMCAST_BIND` / `ROOMCAST_IDLE_TIMEOUT_SECS` from the
//! environment and keeps registered accounts in memory.

use roomcast::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    roomcast::init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.bind_addr, "starting arena server");

    let server = RoomcastServer::builder()
        .config(config)
        .build(MemoryCredentialStore::new())
        .await?;

    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use serde_json::json;
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::Message;

    type Ws = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn start() -> String {
        let server = RoomcastServer::builder()
            .bind("127.0.0.1:0")
            .build(MemoryCredentialStore::new())
            .await
            .unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        addr
    }

    async fn ws(addr: &str) -> Ws {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        ws
    }

    async fn next_event(ws: &mut Ws) -> serde_json::Value {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        serde_json::from_str(msg.to_text().unwrap()).unwrap()
    }

    async fn emit(ws: &mut Ws, value: serde_json::Value) {
        ws.send(Message::Text(value.to_string().into())).await.unwrap();
    }

    #[tokio::test]
    async fn test_two_players_see_each_other_move() {
        let addr = start().await;
        let mut p1 = ws(&addr).await;
        let mut p2 = ws(&addr).await;

        emit(&mut p1, json!({"event": "join game", "username": "p1", "roomId": "arena"})).await;
        assert_eq!(next_event(&mut p1).await["event"], "player joined");

        emit(&mut p2, json!({"event": "join game", "username": "p2", "roomId": "arena"})).await;
        let joined = next_event(&mut p1).await;
        assert_eq!(joined["username"], "p2");
        assert_eq!(joined["players"].as_array().unwrap().len(), 2);
        assert_eq!(joined["gameState"]["ball"], json!({"x": 50, "y": 50}));
        next_event(&mut p2).await;

        emit(&mut p2, json!({"event": "player move", "x": 300, "y": 120})).await;
        let moved = next_event(&mut p1).await;
        assert_eq!(moved["event"], "player moved");
        assert_eq!(moved["username"], "p2");
        assert_eq!((moved["x"].as_i64(), moved["y"].as_i64()), (Some(300), Some(120)));

        p2.close(None).await.unwrap();
        let left = next_event(&mut p1).await;
        assert_eq!(left["event"], "player left");
        assert_eq!(left["players"].as_array().unwrap().len(), 1);
    }
}
