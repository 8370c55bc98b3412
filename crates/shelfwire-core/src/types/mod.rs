//! Common types shared across crates.

pub mod id;
pub mod pagination;

pub use id::UserId;
pub use pagination::{PageRequest, PageResponse};
