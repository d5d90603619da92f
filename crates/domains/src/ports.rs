//! # Core Traits (Ports)
//!
//! Storage and auth adapters implement these contracts. Services hold them
//! as `Arc<dyn Trait>` and never see a concrete backend.
//!
//! Repository methods return `Ok(None)` / `Ok(false)` for missing records;
//! mapping that to `NotFound` is the caller's job. `DomainError::Conflict`
//! signals a uniqueness violation (slug, username, email, duplicate report),
//! and `DomainError::Internal` wraps unexpected backend failures.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Blog, Comment, LikeOutcome, Report, ReportStatus, ReportTarget, User,
};
use crate::query::{
    BlogFilter, CommentFilter, Page, PageRequest, ReportFilter, UserFilter,
};

/// Grouped report counts for the admin dashboard.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ReportStats {
    pub by_status: Vec<CountBucket>,
    pub by_type: Vec<CountBucket>,
    pub by_reason: Vec<CountBucket>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CountBucket {
    pub key: String,
    pub count: u64,
}

/// Persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` if the username or email is already taken.
    async fn insert(&self, user: User) -> Result<User>;
    async fn find(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update(&self, user: User) -> Result<User>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list(&self, filter: UserFilter, page: PageRequest) -> Result<Page<User>>;
    async fn count(&self) -> Result<u64>;
    /// Newest accounts first.
    async fn recent(&self, limit: u64) -> Result<Vec<User>>;
}

/// Persistence contract for blog posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlogRepo: Send + Sync {
    /// Fails with `Conflict` if the slug is already taken; the blog service
    /// retries with a numeric suffix.
    async fn insert(&self, blog: Blog) -> Result<Blog>;
    async fn find(&self, id: Uuid) -> Result<Option<Blog>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>>;
    /// Writes the content fields. `views` and `likes` are owned by their
    /// atomic operations and ignored here; the slug never changes.
    async fn update(&self, blog: Blog) -> Result<Blog>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list(&self, filter: BlogFilter, page: PageRequest) -> Result<Page<Blog>>;
    /// Atomic membership toggle on the like set. `None` if the blog is gone.
    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<LikeOutcome>>;
    /// Atomic `views + 1`; a no-op for a missing blog.
    async fn increment_views(&self, id: Uuid) -> Result<()>;
    /// Removes every blog authored by `author`, returning the count.
    async fn delete_by_author(&self, author: Uuid) -> Result<u64>;
    async fn count(&self) -> Result<u64>;
    async fn recent(&self, limit: u64) -> Result<Vec<Blog>>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment>;
    async fn find(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Writes the content fields; `likes` is owned by `toggle_like`.
    async fn update(&self, comment: Comment) -> Result<Comment>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list(&self, filter: CommentFilter, page: PageRequest) -> Result<Page<Comment>>;
    /// Top-level comments of a blog, newest first.
    async fn list_top_level(&self, blog: Uuid, page: PageRequest) -> Result<Page<Comment>>;
    /// Direct replies to one comment, oldest first.
    async fn replies_of(&self, parent: Uuid) -> Result<Vec<Comment>>;
    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<LikeOutcome>>;
    async fn delete_by_author(&self, author: Uuid) -> Result<u64>;
    async fn delete_by_blog(&self, blog: Uuid) -> Result<u64>;
    /// Removes direct replies only; replies-to-replies keep their parent id.
    async fn delete_replies(&self, parent: Uuid) -> Result<u64>;
    async fn count(&self) -> Result<u64>;
    async fn count_for_blog(&self, blog: Uuid) -> Result<u64>;
}

/// Persistence contract for moderation reports.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReportRepo: Send + Sync {
    async fn insert(&self, report: Report) -> Result<Report>;
    async fn find(&self, id: Uuid) -> Result<Option<Report>>;
    async fn update(&self, report: Report) -> Result<Report>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list(&self, filter: ReportFilter, page: PageRequest) -> Result<Page<Report>>;
    /// Duplicate check over the (reporter, target) pair; the target variant
    /// already encodes the report type.
    async fn exists_for(&self, reporter: Uuid, target: ReportTarget) -> Result<bool>;
    async fn delete_by_reporter(&self, reporter: Uuid) -> Result<u64>;
    async fn delete_by_target(&self, target: ReportTarget) -> Result<u64>;
    async fn count(&self) -> Result<u64>;
    async fn count_by_status(&self, status: ReportStatus) -> Result<u64>;
    async fn stats(&self) -> Result<ReportStats>;
    async fn recent(&self, limit: u64) -> Result<Vec<Report>>;
}

/// External collaborator: password hashing. The core never inspects hashes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// External collaborator: opaque bearer tokens for session identity.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthTokens: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String>;
    /// Fails with `Unauthorized` for expired or malformed tokens.
    fn verify(&self, token: &str) -> Result<Uuid>;
}
