//! Event router: the per-connection state machine.
//!
//! The router owns the session registry and the room store. Each inbound
//! event runs one transition against them and returns the [`Effect`]s the
//! caller must carry out, in order. The router never touches a socket or
//! a channel, which keeps every transition testable as a plain function.
//!
//! ```text
//!   connect ──→ Connected ──(join)──→ InRoom ──(join)──→ InRoom
//!                   │                    │
//!                   └────(disconnect)────┴──→ (no session)
//! ```

use roomcast_protocol::{ClientEvent, ConnectionId, Recipient, RoomId, ServerEvent};
use roomcast_room::{Departure, RoomConfig, RoomStore};
use roomcast_session::{SessionRegistry, SessionState};

/// Something the router wants done after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Add the connection to the room's broadcast group.
    Subscribe {
        connection_id: ConnectionId,
        room_id: RoomId,
    },

    /// Deliver `event` to `recipient`.
    Broadcast {
        recipient: Recipient,
        event: ServerEvent,
    },

    /// Forget the connection: drop it from every group and close its outlet.
    Release(ConnectionId),
}

/// Owns all session and room state.
#[derive(Debug, Default)]
pub struct Router {
    sessions: SessionRegistry,
    rooms: RoomStore,
}

impl Router {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            rooms: RoomStore::new(config),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    /// A new connection arrived.
    pub fn connect(&mut self, connection_id: ConnectionId) -> Vec<Effect> {
        self.sessions.on_connect(connection_id);
        Vec::new()
    }

    /// Routes a decoded client event.
    ///
    /// Registration and heartbeats are answered by the connection handler
    /// and never change room state, so they produce nothing here.
    pub fn dispatch(
        &mut self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Vec<Effect> {
        match event {
            ClientEvent::Join { username, room_id } => {
                self.join(connection_id, room_id, username)
            }
            ClientEvent::Move { x, y } => self.move_to(connection_id, x, y),
            ClientEvent::Register { .. } | ClientEvent::Heartbeat { .. } => {
                tracing::debug!(%connection_id, "not a room event, ignored");
                Vec::new()
            }
        }
    }

    /// Joins (or creates) `room_id` as `username`.
    ///
    /// Allowed from any live state. Joining again adds another member
    /// entry and leaves the previous room untouched.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        username: String,
    ) -> Vec<Effect> {
        let outcome = self
            .rooms
            .get_or_create(&room_id)
            .add_member(connection_id, &username);
        self.sessions
            .set_room(connection_id, room_id.clone(), username.clone());

        vec![
            Effect::Subscribe {
                connection_id,
                room_id: room_id.clone(),
            },
            Effect::Broadcast {
                recipient: Recipient::Room(room_id),
                event: ServerEvent::PlayerJoined {
                    username,
                    players: outcome.players,
                    game_state: outcome.game_state,
                },
            },
        ]
    }

    /// Moves the sender within its current room.
    ///
    /// A move before any join, or one whose member entry is gone, is
    /// dropped without a reply.
    pub fn move_to(
        &mut self,
        connection_id: ConnectionId,
        x: i64,
        y: i64,
    ) -> Vec<Effect> {
        let Some(session) = self.sessions.get(&connection_id) else {
            tracing::debug!(%connection_id, "move from unknown connection dropped");
            return Vec::new();
        };
        let SessionState::InRoom {
            room_id,
            display_name,
        } = session.state()
        else {
            tracing::debug!(%connection_id, "move before join dropped");
            return Vec::new();
        };

        if let Err(e) = self.rooms.move_member(room_id, connection_id, x, y) {
            tracing::debug!(%connection_id, error = %e, "move dropped");
            return Vec::new();
        }

        vec![Effect::Broadcast {
            recipient: Recipient::RoomExcept {
                room_id: room_id.clone(),
                except: connection_id,
            },
            event: ServerEvent::PlayerMoved {
                id: connection_id,
                username: display_name.to_string(),
                x,
                y,
            },
        }]
    }

    /// The connection is gone.
    ///
    /// Only the room in the session is cleaned up. A second disconnect for
    /// the same id finds no session and produces nothing.
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Vec<Effect> {
        let Some(session) = self.sessions.on_disconnect(&connection_id) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if let (Some(room_id), Some(username)) =
            (session.room_id, session.display_name)
        {
            match self.rooms.depart(&room_id, connection_id, &username) {
                Some(Departure::Remaining(players)) => {
                    effects.push(Effect::Broadcast {
                        recipient: Recipient::RoomExcept {
                            room_id,
                            except: connection_id,
                        },
                        event: ServerEvent::PlayerLeft {
                            id: connection_id,
                            username,
                            players,
                        },
                    });
                }
                Some(Departure::Closed) => {}
                None => {
                    tracing::warn!(%connection_id, %room_id, "session pointed at a missing room");
                }
            }
        }

        effects.push(Effect::Release(connection_id));
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcast_protocol::Member;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn rid(name: &str) -> RoomId {
        RoomId::from(name)
    }

    fn names(players: &[Member]) -> Vec<&str> {
        players.iter().map(|m| m.username.as_str()).collect()
    }

    /// Router with alice (1) and bob (2) connected and joined to r1.
    fn router_with_alice_and_bob() -> Router {
        let mut router = Router::default();
        router.connect(cid(1));
        router.connect(cid(2));
        router.join(cid(1), rid("r1"), "alice".into());
        router.join(cid(2), rid("r1"), "bob".into());
        router
    }

    // =====================================================================
    // connect / join
    // =====================================================================

    #[test]
    fn test_connect_creates_session_without_effects() {
        let mut router = Router::default();

        let effects = router.connect(cid(1));

        assert!(effects.is_empty());
        assert_eq!(router.sessions().len(), 1);
        assert!(router.rooms().is_empty());
    }

    #[test]
    fn test_join_empty_store_creates_room_with_one_member() {
        let mut router = Router::default();
        router.connect(cid(1));

        let effects = router.join(cid(1), rid("r1"), "alice".into());

        let room = router.rooms().get(&rid("r1")).unwrap();
        assert_eq!(room.member_count(), 1);
        assert_eq!(room.scores().get("alice"), Some(&0));
        let member = room.member(cid(1)).unwrap();
        assert!((0..700).contains(&member.x));
        assert!((0..500).contains(&member.y));

        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[0],
            Effect::Subscribe {
                connection_id: cid(1),
                room_id: rid("r1"),
            }
        );
        match &effects[1] {
            Effect::Broadcast {
                recipient: Recipient::Room(room_id),
                event: ServerEvent::PlayerJoined { username, players, game_state },
            } => {
                assert_eq!(room_id, &rid("r1"));
                assert_eq!(username, "alice");
                assert_eq!(names(players), vec!["alice"]);
                assert_eq!(game_state.ball.x, 50);
            }
            other => panic!("expected player joined broadcast, got {other:?}"),
        }
    }

    #[test]
    fn test_join_second_member_broadcasts_both_players() {
        let mut router = Router::default();
        router.join(cid(1), rid("r1"), "alice".into());

        let effects = router.join(cid(2), rid("r1"), "bob".into());

        match &effects[1] {
            Effect::Broadcast {
                event: ServerEvent::PlayerJoined { players, game_state, .. },
                ..
            } => {
                assert_eq!(names(players), vec!["alice", "bob"]);
                assert_eq!(game_state.players, *players);
                assert_eq!(game_state.scores.len(), 2);
            }
            other => panic!("expected player joined broadcast, got {other:?}"),
        }
    }

    #[test]
    fn test_join_without_connect_still_creates_session() {
        let mut router = Router::default();

        router.join(cid(5), rid("r1"), "eve".into());

        let session = router.sessions().get(&cid(5)).unwrap();
        assert_eq!(session.room_id, Some(rid("r1")));
    }

    #[test]
    fn test_join_second_room_keeps_first_membership() {
        let mut router = Router::default();
        router.join(cid(1), rid("r1"), "alice".into());

        router.join(cid(1), rid("r2"), "alice".into());

        assert_eq!(router.rooms().len(), 2);
        assert!(router.rooms().get(&rid("r1")).unwrap().member(cid(1)).is_some());
        assert_eq!(
            router.sessions().get(&cid(1)).unwrap().room_id,
            Some(rid("r2"))
        );
    }

    // =====================================================================
    // move
    // =====================================================================

    #[test]
    fn test_move_in_room_broadcasts_to_others() {
        let mut router = router_with_alice_and_bob();

        let effects = router.move_to(cid(1), 10, 20);

        assert_eq!(
            effects,
            vec![Effect::Broadcast {
                recipient: Recipient::RoomExcept {
                    room_id: rid("r1"),
                    except: cid(1),
                },
                event: ServerEvent::PlayerMoved {
                    id: cid(1),
                    username: "alice".into(),
                    x: 10,
                    y: 20,
                },
            }]
        );
        let member = router.rooms().get(&rid("r1")).unwrap().member(cid(1)).unwrap();
        assert_eq!((member.x, member.y), (10, 20));
    }

    #[test]
    fn test_move_before_join_is_noop() {
        let mut router = Router::default();
        router.connect(cid(1));

        let effects = router.move_to(cid(1), 1, 1);

        assert!(effects.is_empty());
        assert!(router.rooms().is_empty());
    }

    #[test]
    fn test_move_unknown_connection_is_noop() {
        let mut router = router_with_alice_and_bob();
        let before = router.rooms().get(&rid("r1")).unwrap().game_state().clone();

        let effects = router.move_to(cid(99), 1, 1);

        assert!(effects.is_empty());
        assert_eq!(router.rooms().get(&rid("r1")).unwrap().game_state(), &before);
    }

    #[test]
    fn test_dispatch_routes_move_event() {
        let mut router = router_with_alice_and_bob();

        let effects = router.dispatch(cid(2), ClientEvent::Move { x: 3, y: 4 });

        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_dispatch_heartbeat_has_no_effects() {
        let mut router = router_with_alice_and_bob();

        let effects =
            router.dispatch(cid(1), ClientEvent::Heartbeat { client_time: 1 });

        assert!(effects.is_empty());
    }

    // =====================================================================
    // disconnect
    // =====================================================================

    #[test]
    fn test_disconnect_with_others_broadcasts_player_left() {
        let mut router = router_with_alice_and_bob();

        let effects = router.disconnect(cid(1));

        assert_eq!(effects.len(), 2);
        match &effects[0] {
            Effect::Broadcast {
                recipient: Recipient::RoomExcept { room_id, except },
                event: ServerEvent::PlayerLeft { id, username, players },
            } => {
                assert_eq!(room_id, &rid("r1"));
                assert_eq!(*except, cid(1));
                assert_eq!(*id, cid(1));
                assert_eq!(username, "alice");
                assert_eq!(names(players), vec!["bob"]);
            }
            other => panic!("expected player left broadcast, got {other:?}"),
        }
        assert_eq!(effects[1], Effect::Release(cid(1)));

        let room = router.rooms().get(&rid("r1")).unwrap();
        assert!(!room.scores().contains_key("alice"));
    }

    #[test]
    fn test_disconnect_last_member_closes_room_silently() {
        let mut router = router_with_alice_and_bob();
        router.disconnect(cid(1));

        let effects = router.disconnect(cid(2));

        assert_eq!(effects, vec![Effect::Release(cid(2))]);
        assert!(router.rooms().get(&rid("r1")).is_none());
    }

    #[test]
    fn test_disconnect_without_join_only_releases() {
        let mut router = Router::default();
        router.connect(cid(1));

        let effects = router.disconnect(cid(1));

        assert_eq!(effects, vec![Effect::Release(cid(1))]);
        assert!(router.sessions().is_empty());
    }

    #[test]
    fn test_disconnect_twice_second_is_noop() {
        let mut router = router_with_alice_and_bob();
        router.disconnect(cid(1));

        let effects = router.disconnect(cid(1));

        assert!(effects.is_empty());
        assert_eq!(router.rooms().get(&rid("r1")).unwrap().member_count(), 1);
    }

    #[test]
    fn test_disconnect_after_rejoin_cleans_only_current_room() {
        let mut router = Router::default();
        router.join(cid(1), rid("r1"), "alice".into());
        router.join(cid(2), rid("r1"), "bob".into());
        router.join(cid(1), rid("r2"), "alice".into());

        router.disconnect(cid(1));

        assert!(router.rooms().get(&rid("r2")).is_none());
        assert!(router.rooms().get(&rid("r1")).unwrap().member(cid(1)).is_some());
    }
}
