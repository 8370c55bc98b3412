//! Notification inbox management.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use shelfwire_core::error::AppError;
use shelfwire_core::result::AppResult;
use shelfwire_core::types::id::UserId;
use shelfwire_core::types::pagination::{PageRequest, PageResponse};
use shelfwire_database::NotificationStore;
use shelfwire_entity::notification::Notification;

/// Manages a recipient's notification inbox.
///
/// Every operation is scoped to the calling user; acting on someone
/// else's notification reports not-found rather than leaking existence.
#[derive(Clone)]
pub struct NotificationManagementService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationManagementService {
    /// Creates a new service over the given store.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Lists the user's notifications, newest first. With `unread_only`
    /// the read ones are filtered out before paging.
    pub async fn list(
        &self,
        user_id: UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>> {
        if unread_only {
            self.store.list_unread_for_recipient(user_id, page).await
        } else {
            self.store.list_for_recipient(user_id, page).await
        }
    }

    /// Number of unread notifications for the user.
    pub async fn unread_count(&self, user_id: UserId) -> AppResult<u64> {
        self.store.count_unread(user_id).await
    }

    /// Marks one notification read.
    ///
    /// Succeeds on the unread-to-read transition and on a repeat call
    /// (already read is not an error). Fails with not-found when the
    /// notification does not exist or belongs to someone else.
    pub async fn mark_read(&self, user_id: UserId, notification_id: Uuid) -> AppResult<()> {
        if self.store.mark_read(notification_id, user_id, Utc::now()).await? {
            return Ok(());
        }
        // Zero rows changed: distinguish already-read from missing.
        match self.store.find(notification_id).await? {
            Some(n) if n.recipient_id == user_id => Ok(()),
            _ => Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            ))),
        }
    }

    /// Marks every unread notification read. Returns rows changed.
    pub async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let changed = self.store.mark_all_read(user_id, Utc::now()).await?;
        info!(user_id = %user_id, changed, "marked all notifications read");
        Ok(changed)
    }

    /// Deletes one notification, ownership-checked.
    pub async fn delete(&self, user_id: UserId, notification_id: Uuid) -> AppResult<()> {
        if self.store.delete(notification_id, user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )))
        }
    }

    /// Retention sweep: removes notifications older than `retention_days`.
    pub async fn cleanup_old(&self, retention_days: u32) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        let removed = self.store.purge_older_than(cutoff).await?;
        if removed > 0 {
            info!(removed, %cutoff, "purged old notifications");
        }
        Ok(removed)
    }
}
