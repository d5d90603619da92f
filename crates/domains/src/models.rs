//! # Domain Models
//!
//! These structs represent the core entities of Inkpress.
//! We use UUID v7 for time-ordered, globally unique identification, which
//! keeps "newest first" listings consistent with id order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privilege level attached to a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// A registered account. The password hash is opaque to the domain; only the
/// `PasswordHasher` port knows how to produce or verify it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique handle shown next to authored content.
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar: Option<Avatar>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile image stored inline with the account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    pub content_type: String,
}

/// The acting identity a request resolves to. `None` at the call sites means
/// an anonymous visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor { id: user.id, role: user.role }
    }
}

/// A blog post. `slug` is assigned once at creation and never changes, even
/// if the title is edited later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    /// URL-safe unique identifier derived from the title.
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Uuid,
    pub published: bool,
    /// Monotonic counter, bumped on every public read by slug.
    pub views: i64,
    /// Set of user ids; membership is toggled atomically by the store.
    pub likes: Vec<Uuid>,
    /// Estimated minutes to read, `ceil(word_count / 200)`.
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.contains(&user)
    }
}

/// A comment on a blog. `parent == None` marks a top-level comment; a reply
/// carries the id of a comment on the same blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub blog: Uuid,
    pub parent: Option<Uuid>,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.contains(&user)
    }
}

/// Result of an atomic like toggle on a blog or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub is_liked: bool,
    pub likes_count: u64,
}

/// Wire-level classification of a report, as submitted by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Article,
    Comment,
    User,
    General,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Article => "article",
            ReportType::Comment => "comment",
            ReportType::User => "user",
            ReportType::General => "general",
        }
    }
}

/// The fixed set of reasons a reporter may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    Harassment,
    InappropriateContent,
    CopyrightViolation,
    Misinformation,
    HateSpeech,
    Other,
}

impl ReportReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Harassment => "harassment",
            ReportReason::InappropriateContent => "inappropriate_content",
            ReportReason::CopyrightViolation => "copyright_violation",
            ReportReason::Misinformation => "misinformation",
            ReportReason::HateSpeech => "hate_speech",
            ReportReason::Other => "other",
        }
    }
}

/// Moderation state of a report. `Resolved` and `Dismissed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Dismissed)
    }

    /// The report state machine:
    /// `pending → {reviewed, resolved, dismissed}`, `reviewed → {resolved,
    /// dismissed}`, terminal states admit nothing.
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        match self {
            ReportStatus::Pending => next != ReportStatus::Pending,
            ReportStatus::Reviewed => next.is_terminal(),
            ReportStatus::Resolved | ReportStatus::Dismissed => false,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminated reference to the entity a report is about. Replaces the
/// untyped foreign-key-plus-tag pair with a variant per entity kind, so every
/// dispatch on the target is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", content = "id")]
pub enum ReportTarget {
    Blog(Uuid),
    Comment(Uuid),
    User(Uuid),
}

impl ReportTarget {
    pub fn id(self) -> Uuid {
        match self {
            ReportTarget::Blog(id) | ReportTarget::Comment(id) | ReportTarget::User(id) => id,
        }
    }

    /// The tag persisted next to the id in the store.
    pub fn model(self) -> &'static str {
        match self {
            ReportTarget::Blog(_) => "Blog",
            ReportTarget::Comment(_) => "Comment",
            ReportTarget::User(_) => "User",
        }
    }

    pub fn from_model(model: &str, id: Uuid) -> Option<Self> {
        match model {
            "Blog" => Some(ReportTarget::Blog(id)),
            "Comment" => Some(ReportTarget::Comment(id)),
            "User" => Some(ReportTarget::User(id)),
            _ => None,
        }
    }
}

/// An abuse report or general complaint filed by a non-admin user.
/// `target == None` if and only if the report type is `general`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub reporter: Uuid,
    pub target: Option<ReportTarget>,
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// The wire type tag is fully determined by the target variant.
    pub fn report_type(&self) -> ReportType {
        match self.target {
            None => ReportType::General,
            Some(ReportTarget::Blog(_)) => ReportType::Article,
            Some(ReportTarget::Comment(_)) => ReportType::Comment,
            Some(ReportTarget::User(_)) => ReportType::User,
        }
    }
}
