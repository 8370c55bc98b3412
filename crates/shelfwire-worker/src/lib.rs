//! # shelfwire-worker
//!
//! Background maintenance: the cron scheduler and the retention sweep
//! that keeps the notification and activity tables bounded.

pub mod jobs;
pub mod scheduler;

pub use jobs::retention::RetentionSweeper;
pub use scheduler::CronScheduler;
