//! HTTP-level blog and comment flows.

mod fixtures;

use axum::http::StatusCode;
use domains::Role;
use fixtures::{error_kind, send, TestApp};
use serde_json::json;

#[tokio::test]
async fn create_read_like_flow() {
    let app = TestApp::new();
    let router = app.router();
    let author = app.seed_user("author", Role::User).await;
    let token = app.token_for(&author);

    let (status, body) = send(
        &router,
        "POST",
        "/api/blogs",
        Some(&token),
        Some(json!({
            "title": "Hello API",
            "content": "Words flow over the wire.",
            "excerpt": "Words.",
            "tags": "rust, axum",
            "published": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["blog"]["slug"], "hello-api");
    assert_eq!(body["blog"]["tags"], json!(["rust", "axum"]));
    assert_eq!(body["blog"]["author"]["username"], "author");
    let blog_id = body["blog"]["id"].as_str().unwrap().to_string();

    // Public read by slug, anonymous, counts a view.
    let (status, body) = send(&router, "GET", "/api/blogs/hello-api", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["views"], 1);
    assert_eq!(body["isLiked"], false);

    let (status, body) =
        send(&router, "POST", &format!("/api/blogs/{blog_id}/like"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["isLiked"], true);

    let (_, body) =
        send(&router, "POST", &format!("/api/blogs/{blog_id}/like"), Some(&token), None).await;
    assert_eq!(body["likesCount"], 0);
    assert_eq!(body["isLiked"], false);
}

#[tokio::test]
async fn listing_envelope_and_pagination_keys() {
    let app = TestApp::new();
    let author = app.seed_user("lister", Role::User).await;
    for i in 0..25 {
        app.seed_blog(&author, &format!("Post {i}"), true).await;
    }
    app.seed_blog(&author, "Draft post", false).await;
    let router = app.router();

    let (status, body) = send(&router, "GET", "/api/blogs?page=3&limit=10", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blogs"].as_array().unwrap().len(), 5);
    assert_eq!(body["currentPage"], 3);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["totalBlogs"], 25);
}

#[tokio::test]
async fn mutations_enforce_identity_and_ownership() {
    let app = TestApp::new();
    let router = app.router();
    let author = app.seed_user("owner", Role::User).await;
    let stranger = app.seed_user("stranger", Role::User).await;
    let blog = app.seed_blog(&author, "Protected", true).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/blogs",
        None,
        Some(json!({ "title": "t", "content": "c", "excerpt": "e" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(&body), "unauthorized");

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/api/blogs/{}", blog.id),
        Some(&app.token_for(&stranger)),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_kind(&body), "forbidden");

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/blogs/{}", blog.id),
        Some(&app.token_for(&author)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "GET", "/api/blogs/protected", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_threading_over_http() {
    let app = TestApp::new();
    let router = app.router();
    let author = app.seed_user("host", Role::User).await;
    let guest = app.seed_user("guest", Role::User).await;
    let blog = app.seed_blog(&author, "Conversations", true).await;
    let token = app.token_for(&guest);

    let (status, body) = send(
        &router,
        "POST",
        &format!("/api/blogs/{}/comments", blog.id),
        Some(&token),
        Some(json!({ "content": "first!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let parent_id = body["comment"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        "POST",
        &format!("/api/blogs/{}/comments", blog.id),
        Some(&token),
        Some(json!({ "content": "replying to myself", "parentComment": parent_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/blogs/{}/comments", blog.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalComments"], 1);
    let thread = &body["comments"][0];
    assert_eq!(thread["content"], "first!");
    assert_eq!(thread["author"]["username"], "guest");
    assert_eq!(thread["replies"].as_array().unwrap().len(), 1);
    assert_eq!(thread["replies"][0]["content"], "replying to myself");
}
