//! Broadcast groups and per-connection outlets.
//!
//! The hub is the only place that knows how to reach a connection. It
//! executes the router's [`Effect`]s: subscriptions, broadcasts and
//! releases. Delivery is a non-blocking push onto an unbounded channel
//! drained by the connection's writer task, so a slow client never stalls
//! the core.

use std::collections::HashMap;

use roomcast_protocol::{ConnectionId, Recipient, RoomId, ServerEvent};
use tokio::sync::mpsc;

use crate::router::Effect;

/// Channel sender for delivering outbound events to one connection.
pub type Outlet = mpsc::UnboundedSender<ServerEvent>;

#[derive(Debug, Default)]
pub(crate) struct Hub {
    outlets: HashMap<ConnectionId, Outlet>,
    /// Subscribers per room, in subscription order.
    groups: HashMap<RoomId, Vec<ConnectionId>>,
}

impl Hub {
    /// Registers the outlet for a newly connected client.
    pub(crate) fn attach(&mut self, connection_id: ConnectionId, outlet: Outlet) {
        self.outlets.insert(connection_id, outlet);
    }

    /// Adds `connection_id` to the room's group. Subscribing twice is a no-op.
    pub(crate) fn subscribe(&mut self, connection_id: ConnectionId, room_id: RoomId) {
        let group = self.groups.entry(room_id).or_default();
        if !group.contains(&connection_id) {
            group.push(connection_id);
        }
    }

    /// Drops the connection from every group and forgets its outlet.
    pub(crate) fn release(&mut self, connection_id: ConnectionId) {
        self.outlets.remove(&connection_id);
        self.groups.retain(|_, group| {
            group.retain(|id| *id != connection_id);
            !group.is_empty()
        });
    }

    /// Pushes `event` to every matching subscriber. Returns how many
    /// outlets accepted it.
    pub(crate) fn broadcast(&self, recipient: &Recipient, event: &ServerEvent) -> usize {
        let except = match recipient {
            Recipient::Room(_) => None,
            Recipient::RoomExcept { except, .. } => Some(*except),
        };
        let Some(group) = self.groups.get(recipient.room_id()) else {
            return 0;
        };

        let mut delivered = 0;
        for connection_id in group.iter().filter(|id| Some(**id) != except) {
            let Some(outlet) = self.outlets.get(connection_id) else {
                continue;
            };
            if outlet.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(%connection_id, "outlet closed, event dropped");
            }
        }
        delivered
    }

    /// Executes effects in order.
    pub(crate) fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Subscribe {
                    connection_id,
                    room_id,
                } => self.subscribe(connection_id, room_id),
                Effect::Broadcast { recipient, event } => {
                    let delivered = self.broadcast(&recipient, &event);
                    tracing::trace!(room_id = %recipient.room_id(), delivered, "broadcast");
                }
                Effect::Release(connection_id) => self.release(connection_id),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn subscribers(&self, room_id: &RoomId) -> &[ConnectionId] {
        self.groups.get(room_id).map(Vec::as_slice).unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn is_attached(&self, connection_id: ConnectionId) -> bool {
        self.outlets.contains_key(&connection_id)
    }
}
