//! # shelfwire-entity
//!
//! Domain models shared between the database, realtime, service, and API
//! crates. All persistent models derive `sqlx::FromRow` and serde traits.

pub mod activity;
pub mod book;
pub mod notification;

pub use activity::{ActivityEntry, ActivityKind, HiddenActivity};
pub use book::BookRef;
pub use notification::{Notification, NotificationKind};
