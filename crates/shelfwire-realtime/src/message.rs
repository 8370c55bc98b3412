//! WebSocket message envelope.
//!
//! Messages are JSON with a `type` discriminator. The only inbound message
//! the engine understands is `IDENTIFY_USER`; everything else flows
//! server-to-client.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages a client may send after connecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Binds the connection to a user id. Until this arrives the
    /// connection only receives broadcast-class messages.
    IdentifyUser {
        /// The authenticated user id (validated by the gateway upstream).
        user_id: Uuid,
    },
}

/// Messages the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Welcome message sent on accept.
    ConnectionEstablished {
        /// Human-readable greeting.
        data: String,
    },
    /// Confirmation that an `IDENTIFY_USER` message was applied.
    UserIdentified {
        /// The bound user id.
        user_id: Uuid,
    },
    /// A targeted notification push. The durable copy is already stored
    /// when this is sent; losing it on the wire loses nothing.
    Notification {
        /// Notification id in the durable store.
        id: Uuid,
        /// Event kind wire string.
        kind: String,
        /// Display message.
        message: String,
        /// Triggering actor, if any.
        actor_id: Option<Uuid>,
        /// Unix millis.
        timestamp: i64,
    },
    /// A feed-style activity update fanned out to followers.
    ActivityUpdate {
        /// Activity entry id.
        id: Uuid,
        /// Activity kind wire string.
        kind: String,
        /// Display message.
        message: String,
        /// Actor display name snapshot.
        actor_display_name: String,
        /// Unix millis.
        timestamp: i64,
    },
    /// Legacy broadcast-class announcement. Never carries per-user content.
    Announcement {
        /// Display message.
        message: String,
        /// Unix millis.
        timestamp: i64,
    },
    /// Protocol error report.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl ServerMessage {
    /// Current time in unix milliseconds, for message timestamps.
    pub fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_round_trips_with_type_tag() {
        let raw = r#"{"type":"IDENTIFY_USER","user_id":"018f2f43-7b9a-7000-8000-000000000001"}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        let ClientMessage::IdentifyUser { user_id } = msg;
        assert_eq!(
            user_id.to_string(),
            "018f2f43-7b9a-7000-8000-000000000001"
        );
    }

    #[test]
    fn server_message_carries_screaming_type() {
        let msg = ServerMessage::ConnectionEstablished {
            data: "Connected to Shelfwire notifications".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "CONNECTION_ESTABLISHED");

        let msg = ServerMessage::Announcement {
            message: "maintenance at midnight".to_string(),
            timestamp: 0,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "ANNOUNCEMENT");
    }
}
