//! # Cascade Deletion Engine
//!
//! Removes an entity together with its statically-known dependents, always
//! dependents first so concurrent readers never see a parentless child.
//!
//! Depth policy (deliberate, matching the observed production behavior):
//! cascades go exactly one hop per entity type. Deleting a user removes the
//! user's blogs, comments, and filed reports, but NOT the comments or
//! reports hanging off those blogs, and NOT reports *targeting* the user;
//! the report display layer renders surviving references as "(Deleted)".
//! Deleting a comment removes its direct replies (and reports targeting
//! comment or replies); replies-to-replies are orphaned, not re-cascaded.
//!
//! Each step is a single atomic store operation, but the sequence as a
//! whole is not transactional; a crash mid-sequence can leave a partial
//! cascade with the parent still present (dependent-first ordering makes
//! the parent the last thing to go).

use std::sync::Arc;

use domains::{
    BlogRepo, CommentRepo, DomainError, ReportRepo, ReportTarget, Result, UserRepo,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct CascadeEngine {
    users: Arc<dyn UserRepo>,
    blogs: Arc<dyn BlogRepo>,
    comments: Arc<dyn CommentRepo>,
    reports: Arc<dyn ReportRepo>,
}

impl CascadeEngine {
    pub fn new(
        users: Arc<dyn UserRepo>,
        blogs: Arc<dyn BlogRepo>,
        comments: Arc<dyn CommentRepo>,
        reports: Arc<dyn ReportRepo>,
    ) -> Self {
        CascadeEngine { users, blogs, comments, reports }
    }

    /// Removes the user's blogs, the user's comments, the reports the user
    /// filed, then the user record itself.
    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        if self.users.find(id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }

        let blogs_removed = self.blogs.delete_by_author(id).await?;
        let comments_removed = self.comments.delete_by_author(id).await?;
        let reports_removed = self.reports.delete_by_reporter(id).await?;
        self.users.delete(id).await?;

        tracing::info!(
            user = %id,
            blogs_removed,
            comments_removed,
            reports_removed,
            "user deleted with owned content"
        );
        Ok(())
    }

    /// Removes the blog's comments, the reports targeting the blog, then
    /// the blog itself.
    pub async fn delete_blog(&self, id: Uuid) -> Result<()> {
        if self.blogs.find(id).await?.is_none() {
            return Err(DomainError::not_found("Blog", id));
        }

        let comments_removed = self.comments.delete_by_blog(id).await?;
        let reports_removed = self.reports.delete_by_target(ReportTarget::Blog(id)).await?;
        self.blogs.delete(id).await?;

        tracing::info!(blog = %id, comments_removed, reports_removed, "blog deleted with dependents");
        Ok(())
    }

    /// Removes the comment's direct replies, the reports targeting the
    /// comment or any removed reply, then the comment itself.
    pub async fn delete_comment(&self, id: Uuid) -> Result<()> {
        if self.comments.find(id).await?.is_none() {
            return Err(DomainError::not_found("Comment", id));
        }

        let mut reports_removed = 0;
        let replies = self.comments.replies_of(id).await?;
        for reply in &replies {
            reports_removed += self.reports.delete_by_target(ReportTarget::Comment(reply.id)).await?;
        }
        let replies_removed = self.comments.delete_replies(id).await?;
        reports_removed += self.reports.delete_by_target(ReportTarget::Comment(id)).await?;
        self.comments.delete(id).await?;

        tracing::info!(comment = %id, replies_removed, reports_removed, "comment deleted with replies");
        Ok(())
    }
}
