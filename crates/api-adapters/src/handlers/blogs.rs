//! Blog endpoints: public listing and reading, authoring, likes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Actor, Blog, Page};
use serde_json::{json, Value};
use services::{BlogUpdate, NewBlog};
use uuid::Uuid;

use crate::dto::{
    BlogListQuery, BlogListResponse, BlogResponse, LikeResponse, MessageResponse, PageQuery,
    CreateBlogRequest, UpdateBlogRequest,
};
use crate::error::ApiError;
use crate::extract::{CurrentUser, MaybeUser};
use crate::handlers::author_ref;
use crate::state::AppState;

const PUBLIC_PAGE_SIZE: u64 = 10;

pub(crate) async fn blog_response(
    state: &AppState,
    blog: Blog,
    viewer: Option<&Actor>,
) -> Result<BlogResponse, ApiError> {
    let author = author_ref(state, blog.author).await?;
    let comments_count = state.comment_repo.count_for_blog(blog.id).await?;
    Ok(BlogResponse::new(blog, author, comments_count, viewer))
}

pub(crate) async fn blog_list_response(
    state: &AppState,
    page: Page<Blog>,
    viewer: Option<&Actor>,
) -> Result<BlogListResponse, ApiError> {
    let mut blogs = Vec::with_capacity(page.items.len());
    for blog in page.items {
        blogs.push(blog_response(state, blog, viewer).await?);
    }
    Ok(BlogListResponse {
        blogs,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_blogs: page.total_count,
    })
}

pub async fn list(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let page = state
        .blogs
        .list_published(query.search.clone(), query.tag.clone(), query.request(PUBLIC_PAGE_SIZE))
        .await?;
    Ok(Json(blog_list_response(&state, page, viewer.as_ref()).await?))
}

pub async fn my_blogs(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let page = state.blogs.list_mine(Some(&actor), query.request(PUBLIC_PAGE_SIZE)).await?;
    Ok(Json(blog_list_response(&state, page, Some(&actor)).await?))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(slug): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = state.blogs.get_by_slug(viewer.as_ref(), &slug).await?;
    Ok(Json(blog_response(&state, blog, viewer.as_ref()).await?))
}

pub async fn get_for_edit(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = state.blogs.get_for_edit(Some(&actor), id).await?;
    Ok(Json(blog_response(&state, blog, Some(&actor)).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let blog = state
        .blogs
        .create(
            Some(&actor),
            NewBlog {
                title: body.title,
                content: body.content,
                excerpt: body.excerpt,
                cover_image: body.cover_image,
                tags: body.tags.map(|tags| tags.into_vec()).unwrap_or_default(),
                published: body.published.unwrap_or(false),
            },
        )
        .await?;

    let blog = blog_response(&state, blog, Some(&actor)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Blog created successfully", "blog": blog })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBlogRequest>,
) -> Result<Json<Value>, ApiError> {
    let blog = state
        .blogs
        .update(
            Some(&actor),
            id,
            BlogUpdate {
                title: body.title,
                content: body.content,
                excerpt: body.excerpt,
                cover_image: body.cover_image,
                tags: body.tags.map(|tags| tags.into_vec()),
                published: body.published,
            },
        )
        .await?;

    let blog = blog_response(&state, blog, Some(&actor)).await?;
    Ok(Json(json!({ "message": "Blog updated successfully", "blog": blog })))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.blogs.delete(Some(&actor), id).await?;
    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>, ApiError> {
    let outcome = state.blogs.toggle_like(Some(&actor), id).await?;
    Ok(Json(LikeResponse {
        message: if outcome.is_liked { "Blog liked" } else { "Blog unliked" }.to_string(),
        likes_count: outcome.likes_count,
        is_liked: outcome.is_liked,
    }))
}
