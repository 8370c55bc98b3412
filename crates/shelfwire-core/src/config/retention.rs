//! Retention sweep configuration.

use serde::{Deserialize, Serialize};

/// Background retention sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Whether the background sweeper runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Notifications older than this many days are purged.
    #[serde(default = "default_notification_days")]
    pub notification_days: u32,
    /// Activity entries older than this many days are purged
    /// (hide markers cascade with them).
    #[serde(default = "default_activity_days")]
    pub activity_days: u32,
    /// Cron expression for the sweep schedule.
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notification_days: default_notification_days(),
            activity_days: default_activity_days(),
            schedule: default_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_days() -> u32 {
    90
}

fn default_activity_days() -> u32 {
    180
}

fn default_schedule() -> String {
    // Daily at 03:30 UTC
    "0 30 3 * * *".to_string()
}
