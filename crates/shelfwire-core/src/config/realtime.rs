//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound buffer size. A connection whose buffer
    /// is full counts as a failed write and is removed from the
    /// registry.
    #[serde(default = "default_send_buffer")]
    pub send_buffer_size: usize,
    /// Maximum WebSocket connections per user (multi-device).
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: default_send_buffer(),
            max_connections_per_user: default_max_connections_per_user(),
        }
    }
}

fn default_send_buffer() -> usize {
    64
}

fn default_max_connections_per_user() -> usize {
    8
}
