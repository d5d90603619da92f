//! Route tree assembly.
//!
//! One route line per path; method routers are combined so param names stay
//! consistent per position (the blog GET takes the path value as a slug,
//! the mutations parse it as an id).

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, auth, blogs, comments, reports};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // ── Auth & profiles ──────────────────────────────────────────────
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/auth/user/{id}", get(auth::user_profile))
        // ── Blogs ────────────────────────────────────────────────────────
        .route("/api/blogs", get(blogs::list).post(blogs::create))
        .route("/api/blogs/my-blogs", get(blogs::my_blogs))
        .route("/api/blogs/edit/{id}", get(blogs::get_for_edit))
        .route(
            "/api/blogs/{id}",
            get(blogs::get_by_slug).put(blogs::update).delete(blogs::delete),
        )
        .route("/api/blogs/{id}/like", post(blogs::toggle_like))
        // ── Comments ─────────────────────────────────────────────────────
        .route(
            "/api/blogs/{id}/comments",
            get(comments::list_for_blog).post(comments::create),
        )
        .route("/api/comments/{id}", put(comments::update).delete(comments::delete))
        .route("/api/comments/{id}/like", post(comments::toggle_like))
        // ── Reports ──────────────────────────────────────────────────────
        .route("/api/reports", post(reports::create))
        // ── Admin ────────────────────────────────────────────────────────
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}", delete(admin::delete_user))
        .route("/api/admin/users/{id}/role", put(admin::update_role))
        .route("/api/admin/blogs", get(admin::list_blogs))
        .route("/api/admin/blogs/{id}", delete(admin::delete_blog))
        .route("/api/admin/comments", get(admin::list_comments))
        .route("/api/admin/comments/{id}", delete(admin::delete_comment))
        .route("/api/admin/reports", get(admin::list_reports))
        .route("/api/admin/reports/stats", get(admin::report_stats))
        .route("/api/admin/reports/{id}", delete(admin::delete_report))
        .route("/api/admin/reports/{id}/status", put(admin::update_report_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
