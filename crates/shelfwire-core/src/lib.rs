//! # shelfwire-core
//!
//! Shared foundation for Shelfwire: the unified error type, configuration
//! schemas, and common types (pagination, identifiers) used by every other
//! crate in the workspace.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
