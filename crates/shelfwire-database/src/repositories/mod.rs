//! Postgres repository implementations of the store traits.

pub mod activity;
pub mod follow;
pub mod notification;

pub use activity::ActivityRepository;
pub use follow::FollowRepository;
pub use notification::NotificationRepository;
