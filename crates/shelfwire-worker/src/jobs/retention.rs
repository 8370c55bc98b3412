//! Retention sweep: deletes notifications and activity entries past
//! their configured age.

use std::sync::Arc;

use tracing::{error, info};

use shelfwire_core::config::retention::RetentionConfig;
use shelfwire_service::activity::ActivityFeedService;
use shelfwire_service::notification::NotificationManagementService;

/// Runs the retention sweep over both stores.
///
/// Read state does not matter; age is the only criterion. Activity
/// purges cascade their hide markers.
#[derive(Clone)]
pub struct RetentionSweeper {
    notifications: Arc<NotificationManagementService>,
    activities: Arc<ActivityFeedService>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    /// Creates a new sweeper.
    pub fn new(
        notifications: Arc<NotificationManagementService>,
        activities: Arc<ActivityFeedService>,
        config: RetentionConfig,
    ) -> Self {
        Self {
            notifications,
            activities,
            config,
        }
    }

    /// Runs one sweep pass. Failures in one store do not stop the other.
    pub async fn run(&self) {
        match self
            .notifications
            .cleanup_old(self.config.notification_days)
            .await
        {
            Ok(removed) => {
                info!(removed, "notification retention sweep complete");
            }
            Err(e) => error!(error = %e, "notification retention sweep failed"),
        }

        match self.activities.cleanup_old(self.config.activity_days).await {
            Ok(removed) => {
                info!(removed, "activity retention sweep complete");
            }
            Err(e) => error!(error = %e, "activity retention sweep failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shelfwire_database::NotificationStore;
    use shelfwire_database::memory::{
        MemoryActivityStore, MemoryFollowGraph, MemoryNotificationStore,
    };
    use shelfwire_entity::activity::{ActivityEntry, ActivityKind};
    use shelfwire_entity::notification::{Notification, NotificationKind};
    use uuid::Uuid;

    use shelfwire_core::types::pagination::PageRequest;
    use shelfwire_database::ActivityStore;

    #[tokio::test]
    async fn sweep_removes_only_expired_rows() {
        let graph = MemoryFollowGraph::new();
        let notif_store = Arc::new(MemoryNotificationStore::new());
        let activity_store = Arc::new(MemoryActivityStore::new(graph.clone()));

        let user = Uuid::now_v7();
        let mut old = Notification::new(NotificationKind::NewFollower, user, None, "old", None, None);
        old.created_at = Utc::now() - Duration::days(120);
        notif_store.append(&old).await.unwrap();
        let fresh = Notification::new(NotificationKind::NewFollower, user, None, "new", None, None);
        notif_store.append(&fresh).await.unwrap();

        let mut stale = ActivityEntry::new(ActivityKind::NewReview, user, "Reader", "stale", None);
        stale.created_at = Utc::now() - Duration::days(200);
        activity_store.append(&stale).await.unwrap();
        let recent = ActivityEntry::new(ActivityKind::NewReview, user, "Reader", "recent", None);
        activity_store.append(&recent).await.unwrap();

        let sweeper = RetentionSweeper::new(
            Arc::new(NotificationManagementService::new(notif_store.clone())),
            Arc::new(ActivityFeedService::new(
                activity_store.clone(),
                Arc::new(graph),
            )),
            RetentionConfig {
                enabled: true,
                notification_days: 90,
                activity_days: 180,
                schedule: "0 30 3 * * *".to_string(),
            },
        );
        sweeper.run().await;

        let notifs = notif_store
            .list_for_recipient(user, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(notifs.total_elements, 1);
        assert_eq!(notifs.content[0].message, "new");

        let entries = activity_store.recent(PageRequest::default()).await.unwrap();
        assert_eq!(entries.total_elements, 1);
        assert_eq!(entries.content[0].message, "recent");
    }
}
