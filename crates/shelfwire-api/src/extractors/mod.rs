//! Custom Axum extractors.

pub mod auth;
pub mod pagination;

pub use auth::GatewayUser;
pub use pagination::PaginationParams;
