//! # shelfwire-api
//!
//! HTTP and WebSocket surface for Shelfwire, built on Axum.
//!
//! Provides the REST endpoints (notifications, activity feeds, event
//! triggers), the WebSocket upgrade with the in-band IDENTIFY handshake,
//! extractors, DTOs, and error mapping. Identity arrives as the
//! `X-User-Id` header set by the gateway in front of this service.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
