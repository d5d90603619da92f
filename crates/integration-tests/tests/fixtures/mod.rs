//! Shared test fixtures: a fully wired service stack over the in-memory
//! store, seed helpers, and a oneshot HTTP driver for the API suites.

#![allow(dead_code)]

use std::sync::Arc;

use api_adapters::AppState;
use auth_adapters::{ArgonPasswordHasher, JwtTokens};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use domains::{
    Actor, AuthTokens, Blog, BlogRepo, Comment, CommentRepo, PasswordHasher, ReportRepo, Role,
    User, UserRepo,
};
use services::{
    BlogService, CascadeEngine, CommentService, DashboardService, NewBlog, ReportService,
    UserService,
};
use storage_adapters::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub users: UserService,
    pub blogs: BlogService,
    pub comments: CommentService,
    pub reports: ReportService,
    pub dashboard: DashboardService,
    pub tokens: Arc<JwtTokens>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let users: Arc<dyn UserRepo> = store.clone();
        let blogs: Arc<dyn BlogRepo> = store.clone();
        let comments: Arc<dyn CommentRepo> = store.clone();
        let reports: Arc<dyn ReportRepo> = store.clone();

        let hasher: Arc<dyn PasswordHasher> = Arc::new(ArgonPasswordHasher::new());
        let tokens = Arc::new(JwtTokens::new(b"integration-test-secret", 60));
        let token_port: Arc<dyn AuthTokens> = tokens.clone();

        let cascade =
            CascadeEngine::new(users.clone(), blogs.clone(), comments.clone(), reports.clone());

        TestApp {
            users: UserService::new(users.clone(), hasher, token_port, cascade.clone()),
            blogs: BlogService::new(blogs.clone(), cascade.clone()),
            comments: CommentService::new(comments.clone(), blogs.clone(), cascade.clone()),
            reports: ReportService::new(
                reports.clone(),
                blogs.clone(),
                comments.clone(),
                users.clone(),
            ),
            dashboard: DashboardService::new(users, blogs, comments, reports),
            tokens,
            store,
        }
    }

    pub fn router(&self) -> Router {
        let users: Arc<dyn UserRepo> = self.store.clone();
        let comments: Arc<dyn CommentRepo> = self.store.clone();
        api_adapters::router(AppState {
            users: self.users.clone(),
            blogs: self.blogs.clone(),
            comments: self.comments.clone(),
            reports: self.reports.clone(),
            dashboard: self.dashboard.clone(),
            user_repo: users,
            comment_repo: comments,
        })
    }

    /// Inserts an account directly; the password hash is a placeholder, so
    /// use `register` in tests that need to log in.
    pub async fn seed_user(&self, name: &str, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "seeded".to_string(),
            role,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        UserRepo::insert(self.store.as_ref(), user).await.unwrap()
    }

    pub async fn seed_blog(&self, author: &User, title: &str, published: bool) -> Blog {
        self.blogs
            .create(
                Some(&Actor::from(author)),
                NewBlog {
                    title: title.to_string(),
                    content: "Some words worth reading.".to_string(),
                    excerpt: "Some words.".to_string(),
                    cover_image: None,
                    tags: vec!["fixture".to_string()],
                    published,
                },
            )
            .await
            .unwrap()
    }

    pub async fn seed_comment(&self, author: &User, blog: Uuid, parent: Option<Uuid>) -> Comment {
        self.comments
            .create(Some(&Actor::from(author)), blog, "A fixture comment".to_string(), parent)
            .await
            .unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.tokens.issue(user.id).unwrap()
    }
}

pub fn actor(user: &User) -> Actor {
    Actor::from(user)
}

/// Drives one request through the router and returns status plus parsed
/// JSON body (`Null` for empty bodies).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

/// The machine-checkable error kind from a structured error body.
pub fn error_kind(body: &serde_json::Value) -> &str {
    body["error"]["kind"].as_str().unwrap_or_default()
}
