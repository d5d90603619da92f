//! Comment endpoints: threaded listing per blog, authoring, likes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Actor, Comment};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::{
    CommentListResponse, CommentResponse, CommentThreadResponse, CreateCommentRequest,
    LikeResponse, MessageResponse, PageQuery, UpdateCommentRequest,
};
use crate::error::ApiError;
use crate::extract::{CurrentUser, MaybeUser};
use crate::handlers::author_ref;
use crate::state::AppState;

const PAGE_SIZE: u64 = 10;

pub(crate) async fn comment_response(
    state: &AppState,
    comment: Comment,
    viewer: Option<&Actor>,
) -> Result<CommentResponse, ApiError> {
    let author = author_ref(state, comment.author).await?;
    Ok(CommentResponse::new(comment, author, viewer))
}

pub async fn list_for_blog(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(blog_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let page = state.comments.list_for_blog(blog_id, query.request(PAGE_SIZE)).await?;

    let mut comments = Vec::with_capacity(page.items.len());
    for thread in page.items {
        let mut replies = Vec::with_capacity(thread.replies.len());
        for reply in thread.replies {
            replies.push(comment_response(&state, reply, viewer.as_ref()).await?);
        }
        comments.push(CommentThreadResponse {
            comment: comment_response(&state, thread.comment, viewer.as_ref()).await?,
            replies,
        });
    }

    Ok(Json(CommentListResponse {
        comments,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_comments: page.total_count,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(blog_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let comment = state
        .comments
        .create(Some(&actor), blog_id, body.content, body.parent_comment)
        .await?;
    let comment = comment_response(&state, comment, Some(&actor)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment created successfully", "comment": comment })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<Value>, ApiError> {
    let comment = state.comments.update(Some(&actor), id, body.content).await?;
    let comment = comment_response(&state, comment, Some(&actor)).await?;
    Ok(Json(json!({ "message": "Comment updated successfully", "comment": comment })))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.comments.delete(Some(&actor), id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>, ApiError> {
    let outcome = state.comments.toggle_like(Some(&actor), id).await?;
    Ok(Json(LikeResponse {
        message: if outcome.is_liked { "Comment liked" } else { "Comment unliked" }.to_string(),
        likes_count: outcome.likes_count,
        is_liked: outcome.is_liked,
    }))
}
