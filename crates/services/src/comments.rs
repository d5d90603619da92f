//! Threaded comments: one level of replies under top-level comments.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Actor, BlogRepo, Comment, CommentFilter, CommentRepo, DomainError, LikeOutcome, Page,
    PageRequest, Result,
};
use uuid::Uuid;

use crate::cascade::CascadeEngine;
use crate::guard;

const MAX_CONTENT_LEN: usize = 1000;

/// A top-level comment with its direct replies attached, the shape comment
/// listings are served in.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    blogs: Arc<dyn BlogRepo>,
    cascade: CascadeEngine,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepo>,
        blogs: Arc<dyn BlogRepo>,
        cascade: CascadeEngine,
    ) -> Self {
        CommentService { comments, blogs, cascade }
    }

    /// Top-level comments of a blog, newest first, each carrying its direct
    /// replies.
    pub async fn list_for_blog(&self, blog_id: Uuid, page: PageRequest) -> Result<Page<CommentThread>> {
        if self.blogs.find(blog_id).await?.is_none() {
            return Err(DomainError::not_found("Blog", blog_id));
        }

        let top_level = self.comments.list_top_level(blog_id, page).await?;
        let mut items = Vec::with_capacity(top_level.items.len());
        for comment in top_level.items {
            let replies = self.comments.replies_of(comment.id).await?;
            items.push(CommentThread { comment, replies });
        }

        Ok(Page {
            items,
            current_page: top_level.current_page,
            total_pages: top_level.total_pages,
            total_count: top_level.total_count,
        })
    }

    /// Creates a top-level comment or a reply. A reply's parent must exist
    /// and belong to the same blog.
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        blog_id: Uuid,
        content: String,
        parent: Option<Uuid>,
    ) -> Result<Comment> {
        let actor = guard::require_actor(actor)?;
        validate_content(&content)?;

        if self.blogs.find(blog_id).await?.is_none() {
            return Err(DomainError::not_found("Blog", blog_id));
        }
        if let Some(parent_id) = parent {
            let parent_comment = self.comments.find(parent_id).await?;
            match parent_comment {
                Some(p) if p.blog == blog_id => {}
                _ => return Err(DomainError::not_found("Parent comment", parent_id)),
            }
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::now_v7(),
            content: content.trim().to_string(),
            author: actor.id,
            blog: blog_id,
            parent,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(comment).await
    }

    pub async fn update(&self, actor: Option<&Actor>, id: Uuid, content: String) -> Result<Comment> {
        let mut comment = self
            .comments
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))?;
        guard::authorize_mutation(actor, comment.author, "comment")?;
        validate_content(&content)?;

        comment.content = content.trim().to_string();
        comment.updated_at = Utc::now();
        self.comments.update(comment).await
    }

    /// Author/admin deletion; direct replies and targeting reports go with
    /// it via the cascade engine.
    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> Result<()> {
        let comment = self
            .comments
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))?;
        guard::authorize_mutation(actor, comment.author, "comment")?;
        self.cascade.delete_comment(id).await
    }

    pub async fn toggle_like(&self, actor: Option<&Actor>, id: Uuid) -> Result<LikeOutcome> {
        let actor = guard::require_actor(actor)?;
        self.comments
            .toggle_like(id, actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    /// Admin listing over all comments with optional content search and
    /// blog filter.
    pub async fn list_admin(
        &self,
        actor: Option<&Actor>,
        search: Option<String>,
        blog: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Comment>> {
        guard::require_admin(actor)?;
        self.comments.list(CommentFilter { search, blog }, page).await
    }

    pub async fn delete_as_admin(&self, actor: Option<&Actor>, id: Uuid) -> Result<()> {
        guard::require_admin(actor)?;
        self.cascade.delete_comment(id).await
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("comment content is required".into()));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(DomainError::Validation(format!(
            "comment must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}
