//! HTTP and WebSocket handlers.

pub mod activity;
pub mod events;
pub mod health;
pub mod notification;
pub mod ws;
