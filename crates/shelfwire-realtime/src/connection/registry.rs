//! Connection registry: tracks all active connections, indexed by user ID.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use shelfwire_core::config::realtime::RealtimeConfig;
use shelfwire_core::types::id::UserId;

use super::handle::{ConnectionHandle, ConnectionId};
use crate::message::ServerMessage;

/// Thread-safe registry of all active WebSocket connections.
///
/// Connections are added anonymously on accept and show up in the
/// per-user index only once identified. One user can hold several
/// connections at the same time (multiple devices or tabs).
#[derive(Debug)]
pub struct ConnectionRegistry {
    config: RealtimeConfig,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// User ID → identified connection handles for that user.
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
}

impl ConnectionRegistry {
    /// Creates a new empty connection registry.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            config,
            by_id: DashMap::new(),
            by_user: DashMap::new(),
        }
    }

    /// Registers a new anonymous connection.
    ///
    /// Returns the handle plus the receiver half of its outbound channel;
    /// the socket task drains the receiver and writes frames to the wire.
    pub fn register(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(self.config.send_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx));
        self.by_id.insert(handle.id, handle.clone());
        debug!(connection_id = %handle.id, "connection registered");
        (handle, rx)
    }

    /// Binds a connection to a user after `IDENTIFY_USER`.
    ///
    /// Re-identifying an already-bound connection moves it between user
    /// buckets. When a user exceeds the per-user connection cap, the
    /// oldest connection is evicted to make room.
    pub fn identify(&self, conn_id: &ConnectionId, user_id: UserId) -> bool {
        let Some(handle) = self.by_id.get(conn_id).map(|e| e.value().clone()) else {
            return false;
        };

        if let Some(previous) = handle.user() {
            if previous == user_id {
                return true;
            }
            self.detach_from_user(&previous, conn_id);
        }

        handle.bind_user(user_id);

        let evicted = {
            let mut connections = self.by_user.entry(user_id).or_default();
            connections.push(handle.clone());
            if connections.len() > self.config.max_connections_per_user {
                let (idx, _) = connections
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| c.connected_at)
                    .map(|(i, c)| (i, c.id))
                    .unwrap_or((0, handle.id));
                Some(connections.remove(idx))
            } else {
                None
            }
        };

        if let Some(old) = evicted {
            old.mark_dead();
            self.by_id.remove(&old.id);
            info!(
                connection_id = %old.id,
                user_id = %user_id,
                "evicted oldest connection over per-user cap"
            );
        }

        debug!(connection_id = %conn_id, user_id = %user_id, "connection identified");
        true
    }

    /// Removes a connection from the registry. Idempotent.
    pub fn unregister(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        handle.mark_dead();
        if let Some(user_id) = handle.user() {
            self.detach_from_user(&user_id, conn_id);
        }
        debug!(connection_id = %conn_id, "connection unregistered");
        Some(handle)
    }

    /// Sends a message to every live connection a user holds.
    ///
    /// Returns `true` when at least one connection took the message.
    /// Connections that turn out dead during the attempt are reaped.
    pub fn send_to_user(&self, user_id: &UserId, msg: &ServerMessage) -> bool {
        let connections = self
            .by_user
            .get(user_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();

        let mut delivered = false;
        for conn in &connections {
            if conn.send(msg.clone()) {
                delivered = true;
            } else if !conn.is_alive() {
                self.unregister(&conn.id);
            }
        }
        delivered
    }

    /// Broadcasts a message to every connection, identified or not.
    ///
    /// Returns the number of connections that took the message.
    pub fn broadcast(&self, msg: &ServerMessage) -> usize {
        let connections: Vec<Arc<ConnectionHandle>> =
            self.by_id.iter().map(|e| e.value().clone()).collect();

        let mut delivered = 0;
        for conn in &connections {
            if conn.send(msg.clone()) {
                delivered += 1;
            } else if !conn.is_alive() {
                self.unregister(&conn.id);
            }
        }
        delivered
    }

    /// Whether a user has at least one identified connection.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.by_user
            .get(user_id)
            .map(|e| !e.value().is_empty())
            .unwrap_or(false)
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique identified users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    fn detach_from_user(&self, user_id: &UserId, conn_id: &ConnectionId) {
        if let Some(mut connections) = self.by_user.get_mut(user_id) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_user.remove(user_id);
            }
        }
    }
}
