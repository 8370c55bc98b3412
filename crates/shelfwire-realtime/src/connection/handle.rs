//! Individual WebSocket connection handle.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use shelfwire_core::types::id::UserId;

use crate::message::ServerMessage;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing messages to the client. A
/// connection starts anonymous and is bound to a user only after the
/// client sends `IDENTIFY_USER`.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User bound to this connection, if identified
    user: RwLock<Option<UserId>>,
    /// Sender for outbound messages
    pub sender: mpsc::Sender<ServerMessage>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive
    pub alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new, not-yet-identified connection handle
    pub fn new(sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: RwLock::new(None),
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// The user this connection is bound to, if any
    pub fn user(&self) -> Option<UserId> {
        *self.user.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Bind this connection to a user
    pub(crate) fn bind_user(&self, user_id: UserId) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user_id);
    }

    /// Send an outbound message to this connection.
    ///
    /// Any failed write marks the connection dead so the registry can
    /// reap it: a closed channel means the client went away, and a full
    /// buffer means the client is too slow to keep.
    pub fn send(&self, msg: ServerMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Connection {} send buffer full, dropping connection", self.id);
                self.mark_dead();
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_after_receiver_drop_marks_dead() {
        let (tx, rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(tx);
        drop(rx);

        assert!(!handle.send(ServerMessage::Announcement {
            message: "hello".to_string(),
            timestamp: 0,
        }));
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn full_buffer_marks_connection_dead() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(tx);

        let msg = ServerMessage::Announcement {
            message: "hello".to_string(),
            timestamp: 0,
        };
        assert!(handle.send(msg.clone()));
        assert!(!handle.send(msg));
        assert!(!handle.is_alive());
    }
}
