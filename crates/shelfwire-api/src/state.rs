//! Application state shared across all handlers.

use std::sync::Arc;

use shelfwire_core::config::AppConfig;
use shelfwire_realtime::connection::registry::ConnectionRegistry;
use shelfwire_realtime::dispatcher::NotificationDispatcher;
use shelfwire_service::activity::ActivityFeedService;
use shelfwire_service::notification::NotificationManagementService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Live WebSocket connection registry
    pub registry: Arc<ConnectionRegistry>,
    /// Event dispatcher (persist-then-push)
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Notification inbox service
    pub notification_service: Arc<NotificationManagementService>,
    /// Activity feed service
    pub activity_service: Arc<ActivityFeedService>,
}
