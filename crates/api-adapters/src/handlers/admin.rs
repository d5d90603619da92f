//! Moderation dashboard endpoints. Role enforcement happens in the service
//! layer's guard calls, not here; these handlers are pure plumbing.

use axum::extract::{Path, Query, State};
use axum::Json;
use domains::{ReportFilter, ReportStats};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::{
    AdminBlogQuery, AdminCommentQuery, AdminCommentListResponse, BlogListResponse,
    DashboardResponse, MessageResponse, ReportAdminResponse, ReportListQuery, ReportListResponse,
    SearchQuery, UpdateReportStatusRequest, UpdateRoleRequest, UserListResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::{blogs::blog_list_response, comments::comment_response};
use crate::state::AppState;

const ADMIN_PAGE_SIZE: u64 = 20;

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let stats = state.dashboard.overview(Some(&actor)).await?;
    Ok(Json(stats.into()))
}

// ── Users ───────────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let page = state
        .users
        .list_admin(Some(&actor), query.search.clone(), query.request(ADMIN_PAGE_SIZE))
        .await?;
    Ok(Json(UserListResponse {
        users: page.items.into_iter().map(UserResponse::from).collect(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_users: page.total_count,
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete(Some(&actor), id).await?;
    Ok(Json(MessageResponse::new("User and associated content deleted successfully")))
}

pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.change_role(Some(&actor), id, body.role).await?;
    let user = UserResponse::from(user);
    Ok(Json(json!({ "message": "User role updated successfully", "user": user })))
}

// ── Blogs ───────────────────────────────────────────────────────────────────

pub async fn list_blogs(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<AdminBlogQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let page = state
        .blogs
        .list_admin(
            Some(&actor),
            query.search.clone(),
            query.published(),
            query.request(ADMIN_PAGE_SIZE),
        )
        .await?;
    Ok(Json(blog_list_response(&state, page, Some(&actor)).await?))
}

pub async fn delete_blog(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.blogs.delete_as_admin(Some(&actor), id).await?;
    Ok(Json(MessageResponse::new("Blog and associated content deleted successfully")))
}

// ── Comments ────────────────────────────────────────────────────────────────

pub async fn list_comments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<AdminCommentQuery>,
) -> Result<Json<AdminCommentListResponse>, ApiError> {
    let page = state
        .comments
        .list_admin(
            Some(&actor),
            query.search.clone(),
            query.blog_id,
            query.request(ADMIN_PAGE_SIZE),
        )
        .await?;

    let mut comments = Vec::with_capacity(page.items.len());
    for comment in page.items {
        comments.push(comment_response(&state, comment, Some(&actor)).await?);
    }
    Ok(Json(AdminCommentListResponse {
        comments,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_comments: page.total_count,
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.comments.delete_as_admin(Some(&actor), id).await?;
    Ok(Json(MessageResponse::new("Comment and replies deleted successfully")))
}

// ── Reports ─────────────────────────────────────────────────────────────────

pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let filter = ReportFilter { status: query.status, report_type: query.report_type };
    let page = state
        .reports
        .list_for_admin(Some(&actor), filter, query.request(ADMIN_PAGE_SIZE))
        .await?;
    Ok(Json(ReportListResponse {
        reports: page.items.into_iter().map(ReportAdminResponse::from).collect(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_reports: page.total_count,
    }))
}

pub async fn update_report_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateReportStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let report = state
        .reports
        .update_status(Some(&actor), id, body.status, body.admin_notes)
        .await?;
    let report = crate::dto::ReportResponse::from(report);
    Ok(Json(json!({ "message": "Report status updated successfully", "report": report })))
}

pub async fn delete_report(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.reports.delete(Some(&actor), id).await?;
    Ok(Json(MessageResponse::new("Report deleted successfully")))
}

pub async fn report_stats(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<ReportStats>, ApiError> {
    Ok(Json(state.reports.stats(Some(&actor)).await?))
}
