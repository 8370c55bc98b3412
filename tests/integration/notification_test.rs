//! Notification inbox endpoint tests.

use http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn list_requires_identity_header() {
    let app = TestApp::new();
    let res = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_identity_header_is_rejected() {
    let app = TestApp::new();
    let res = app
        .router
        .clone()
        .oneshot(
            http::Request::builder()
                .method("GET")
                .uri("/api/notifications")
                .header("X-User-Id", "not-a-uuid")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn follow_event_lands_in_inbox() {
    let app = TestApp::new();
    let alice = app.add_user();
    let bob = app.add_user();

    let res = app
        .request(
            "POST",
            "/api/events/follow",
            Some(json!({
                "follower_id": alice,
                "follower_name": "alice",
                "followee_id": bob,
            })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .request("GET", "/api/notifications", None, Some(bob))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let content = res.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["kind"], "NEW_FOLLOWER");
    assert_eq!(content[0]["message"], "alice started following you!");
    assert_eq!(content[0]["is_read"], false);

    // The actor sees nothing.
    let res = app
        .request("GET", "/api/notifications", None, Some(alice))
        .await;
    assert_eq!(res.body["data"]["total_elements"], 0);
}

#[tokio::test]
async fn unread_count_and_mark_read_flow() {
    let app = TestApp::new();
    let alice = app.add_user();
    let bob = app.add_user();

    for _ in 0..2 {
        app.request(
            "POST",
            "/api/events/review-liked",
            Some(json!({
                "liker_id": alice,
                "liker_name": "alice",
                "author_id": bob,
                "target_id": Uuid::now_v7(),
                "book": { "book_id": null, "external_book_id": "vol-1", "title": "Dune" },
            })),
            None,
        )
        .await;
    }

    let res = app
        .request("GET", "/api/notifications/count", None, Some(bob))
        .await;
    assert_eq!(res.body["data"]["count"], 2);

    let res = app
        .request("GET", "/api/notifications", None, Some(bob))
        .await;
    let id = res.body["data"]["content"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(bob),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    // Repeat call still succeeds.
    let res = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(bob),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .request("GET", "/api/notifications/count", None, Some(bob))
        .await;
    assert_eq!(res.body["data"]["count"], 1);

    // Unread filter drops the read one.
    let res = app
        .request(
            "GET",
            "/api/notifications?unread_only=true",
            None,
            Some(bob),
        )
        .await;
    assert_eq!(res.body["data"]["total_elements"], 1);
}

#[tokio::test]
async fn mark_read_on_foreign_notification_is_not_found() {
    let app = TestApp::new();
    let alice = app.add_user();
    let bob = app.add_user();
    let eve = app.add_user();

    app.request(
        "POST",
        "/api/events/follow",
        Some(json!({
            "follower_id": alice,
            "follower_name": "alice",
            "followee_id": bob,
        })),
        None,
    )
    .await;

    let res = app
        .request("GET", "/api/notifications", None, Some(bob))
        .await;
    let id = res.body["data"]["content"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(eve),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_all_and_delete() {
    let app = TestApp::new();
    let alice = app.add_user();
    let bob = app.add_user();

    for _ in 0..3 {
        app.request(
            "POST",
            "/api/events/follow",
            Some(json!({
                "follower_id": alice,
                "follower_name": "alice",
                "followee_id": bob,
            })),
            None,
        )
        .await;
    }

    let res = app
        .request("PUT", "/api/notifications/read-all", None, Some(bob))
        .await;
    assert_eq!(res.body["data"]["marked"], 3);

    let res = app
        .request("GET", "/api/notifications", None, Some(bob))
        .await;
    let id = res.body["data"]["content"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "DELETE",
            &format!("/api/notifications/{id}"),
            None,
            Some(bob),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .request(
            "DELETE",
            &format!("/api/notifications/{id}"),
            None,
            Some(bob),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_reports_first_and_last() {
    let app = TestApp::new();
    let alice = app.add_user();
    let bob = app.add_user();

    for _ in 0..5 {
        app.request(
            "POST",
            "/api/events/follow",
            Some(json!({
                "follower_id": alice,
                "follower_name": "alice",
                "followee_id": bob,
            })),
            None,
        )
        .await;
    }

    let res = app
        .request("GET", "/api/notifications?page=0&size=2", None, Some(bob))
        .await;
    assert_eq!(res.body["data"]["total_elements"], 5);
    assert_eq!(res.body["data"]["total_pages"], 3);
    assert_eq!(res.body["data"]["first"], true);
    assert_eq!(res.body["data"]["last"], false);

    let res = app
        .request("GET", "/api/notifications?page=2&size=2", None, Some(bob))
        .await;
    assert_eq!(res.body["data"]["content"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["data"]["first"], false);
    assert_eq!(res.body["data"]["last"], true);
}

#[tokio::test]
async fn health_reports_connection_counts() {
    let app = TestApp::new();
    let res = app.request("GET", "/api/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "ok");
    assert_eq!(res.body["data"]["ws_connections"], 0);
}
