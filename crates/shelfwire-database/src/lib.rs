//! # shelfwire-database
//!
//! Persistence layer: the PostgreSQL connection pool, migration runner,
//! the store traits every consumer depends on, their Postgres
//! implementations, and in-memory implementations used by the test
//! harness and embedded mode.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ActivityStore, FollowGraph, NotificationStore};
