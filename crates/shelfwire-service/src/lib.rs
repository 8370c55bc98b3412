//! # shelfwire-service
//!
//! Business logic over the store traits: notification inbox management
//! and the activity feed with its per-viewer visibility mask.

pub mod activity;
pub mod notification;

pub use activity::{ActivityFeedService, HideOutcome};
pub use notification::NotificationManagementService;
