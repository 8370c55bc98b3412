//! # shelfwire-realtime
//!
//! Real-time delivery engine for Shelfwire. Provides:
//!
//! - The live-connection registry (multi-device, self-healing on failed
//!   writes)
//! - The WebSocket message envelope (IDENTIFY handshake, targeted
//!   notifications, feed updates, broadcast announcements)
//! - The notification dispatcher: a single persist-then-push pipeline with
//!   unicast and follower fan-out variants
//!
//! Delivery over the live channel is best-effort; durability is the
//! notification store's job.

pub mod connection;
pub mod dispatcher;
pub mod message;

pub use connection::registry::ConnectionRegistry;
pub use dispatcher::NotificationDispatcher;
pub use message::{ClientMessage, ServerMessage};
