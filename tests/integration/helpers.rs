//! Shared test helpers for integration tests.
//!
//! The app under test runs on the in-memory stores, so no database or
//! network is needed; requests go straight into the router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use shelfwire_api::state::AppState;
use shelfwire_core::config::{AppConfig, DatabaseConfig};
use shelfwire_database::memory::{
    MemoryActivityStore, MemoryFollowGraph, MemoryNotificationStore,
};
use shelfwire_realtime::connection::registry::ConnectionRegistry;
use shelfwire_realtime::dispatcher::NotificationDispatcher;
use shelfwire_service::activity::ActivityFeedService;
use shelfwire_service::notification::NotificationManagementService;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Follow graph backing the app (shared with the stores)
    pub graph: MemoryFollowGraph,
    /// Notification store for direct inspection
    pub notifications: Arc<MemoryNotificationStore>,
    /// Activity store for direct inspection
    pub activities: Arc<MemoryActivityStore>,
    /// Connection registry for live-push assertions
    pub registry: Arc<ConnectionRegistry>,
}

impl TestApp {
    /// Create a new test application over in-memory stores.
    pub fn new() -> Self {
        let config = test_config();

        let graph = MemoryFollowGraph::new();
        let notifications = Arc::new(MemoryNotificationStore::new());
        let activities = Arc::new(MemoryActivityStore::new(graph.clone()));

        let registry = Arc::new(ConnectionRegistry::new(config.realtime.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&registry),
            notifications.clone(),
            activities.clone(),
            Arc::new(graph.clone()),
        ));

        let state = AppState {
            config: Arc::new(config),
            registry: Arc::clone(&registry),
            dispatcher,
            notification_service: Arc::new(NotificationManagementService::new(
                notifications.clone(),
            )),
            activity_service: Arc::new(ActivityFeedService::new(
                activities.clone(),
                Arc::new(graph.clone()),
            )),
        };

        let router = shelfwire_api::router::build_router(state);

        Self {
            router,
            graph,
            notifications,
            activities,
            registry,
        }
    }

    /// Register a user id in the backing directory.
    pub fn add_user(&self) -> Uuid {
        let id = Uuid::now_v7();
        self.graph.add_user(id);
        id
    }

    /// Make an HTTP request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<Uuid>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req.header("X-User-Id", user.to_string());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        realtime: Default::default(),
        retention: Default::default(),
        logging: Default::default(),
    }
}
