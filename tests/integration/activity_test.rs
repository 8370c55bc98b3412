//! Activity feed endpoint tests.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::TestApp;

async fn post_review(app: &TestApp, author: Uuid, author_name: &str, title: &str) {
    let res = app
        .request(
            "POST",
            "/api/events/review-posted",
            Some(json!({
                "author_id": author,
                "author_name": author_name,
                "book": { "book_id": null, "external_book_id": "vol-9", "title": title },
            })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn review_event_appears_in_recent_feed() {
    let app = TestApp::new();
    let author = app.add_user();
    let viewer = app.add_user();

    post_review(&app, author, "casey", "Hyperion").await;

    let res = app
        .request("GET", "/api/activity/recent", None, Some(viewer))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let content = res.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["kind"], "NEW_REVIEW");
    assert_eq!(content[0]["actor_display_name"], "casey");
    assert_eq!(content[0]["book_title"], "Hyperion");
}

#[tokio::test]
async fn friends_feed_shows_followed_users_only() {
    let app = TestApp::new();
    let author = app.add_user();
    let other_author = app.add_user();
    let viewer = app.add_user();
    app.graph.add_follow(viewer, author);

    post_review(&app, author, "casey", "Hyperion").await;
    post_review(&app, other_author, "drew", "Piranesi").await;

    let res = app
        .request("GET", "/api/activity/friends", None, Some(viewer))
        .await;
    let content = res.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["actor_display_name"], "casey");
}

#[tokio::test]
async fn friends_feed_excludes_own_activity() {
    let app = TestApp::new();
    let viewer = app.add_user();
    app.graph.add_follow(viewer, viewer);

    post_review(&app, viewer, "casey", "Hyperion").await;

    let res = app
        .request("GET", "/api/activity/friends", None, Some(viewer))
        .await;
    assert_eq!(res.body["data"]["total_elements"], 0);
}

#[tokio::test]
async fn user_feed_lists_one_actor() {
    let app = TestApp::new();
    let author = app.add_user();
    let other = app.add_user();
    let viewer = app.add_user();

    post_review(&app, author, "casey", "Hyperion").await;
    post_review(&app, other, "drew", "Piranesi").await;

    let res = app
        .request(
            "GET",
            &format!("/api/activity/user/{author}"),
            None,
            Some(viewer),
        )
        .await;
    let content = res.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["actor_id"], author.to_string());
}

#[tokio::test]
async fn hide_requires_author_or_follower() {
    let app = TestApp::new();
    let author = app.add_user();
    let follower = app.add_user();
    let stranger = app.add_user();
    app.graph.add_follow(follower, author);

    post_review(&app, author, "casey", "Hyperion").await;
    let res = app
        .request("GET", "/api/activity/recent", None, Some(author))
        .await;
    let id = res.body["data"]["content"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request("DELETE", &format!("/api/activity/{id}"), None, Some(stranger))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request("DELETE", &format!("/api/activity/{id}"), None, Some(follower))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    // Hidden for the follower, still visible globally.
    let res = app
        .request("GET", "/api/activity/friends", None, Some(follower))
        .await;
    assert_eq!(res.body["data"]["total_elements"], 0);
    let res = app
        .request("GET", "/api/activity/recent", None, Some(follower))
        .await;
    assert_eq!(res.body["data"]["total_elements"], 1);
}

#[tokio::test]
async fn hiding_missing_activity_is_not_found() {
    let app = TestApp::new();
    let viewer = app.add_user();
    let res = app
        .request(
            "DELETE",
            &format!("/api/activity/{}", Uuid::now_v7()),
            None,
            Some(viewer),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_friends_feed_is_a_snapshot() {
    let app = TestApp::new();
    let author = app.add_user();
    let viewer = app.add_user();
    app.graph.add_follow(viewer, author);

    post_review(&app, author, "casey", "Hyperion").await;
    post_review(&app, author, "casey", "Dune").await;

    let res = app
        .request(
            "DELETE",
            "/api/activity/clear-friends-feed",
            None,
            Some(viewer),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["hidden"], 2);

    // New entries after the clear still show up.
    post_review(&app, author, "casey", "Piranesi").await;
    let res = app
        .request("GET", "/api/activity/friends", None, Some(viewer))
        .await;
    let content = res.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["book_title"], "Piranesi");
}

#[tokio::test]
async fn unhide_all_restores_cleared_entries() {
    let app = TestApp::new();
    let author = app.add_user();
    let viewer = app.add_user();
    app.graph.add_follow(viewer, author);

    post_review(&app, author, "casey", "Hyperion").await;
    app.request(
        "DELETE",
        "/api/activity/clear-friends-feed",
        None,
        Some(viewer),
    )
    .await;

    let res = app
        .request("POST", "/api/activity/unhide-all", None, Some(viewer))
        .await;
    assert_eq!(res.body["data"]["restored"], 1);

    let res = app
        .request("GET", "/api/activity/friends", None, Some(viewer))
        .await;
    assert_eq!(res.body["data"]["total_elements"], 1);
}

#[tokio::test]
async fn book_list_event_is_activity_only() {
    let app = TestApp::new();
    let reader = app.add_user();
    let follower = app.add_user();
    app.graph.add_follow(follower, reader);

    let res = app
        .request(
            "POST",
            "/api/events/book-list",
            Some(json!({
                "actor_id": reader,
                "actor_name": "drew",
                "kind": "BOOK_MARKED_AS_READ",
                "book": { "book_id": null, "external_book_id": "vol-3", "title": "Piranesi" },
            })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .request("GET", "/api/activity/friends", None, Some(follower))
        .await;
    let content = res.body["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["message"], "drew finished reading \"Piranesi\"");

    // No inbox notification for a list change.
    let res = app
        .request("GET", "/api/notifications/count", None, Some(follower))
        .await;
    assert_eq!(res.body["data"]["count"], 0);
}
