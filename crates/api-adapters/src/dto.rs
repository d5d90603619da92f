//! Wire types. Field names follow the JSON casing the frontend consumes
//! (`camelCase`); conversions from domain types live next to the structs.

use chrono::{DateTime, Utc};
use domains::{
    Actor, Blog, Comment, PageRequest, Report, ReportReason, ReportStatus, ReportType, Role, User,
};
use serde::{Deserialize, Serialize};
use services::{DashboardStats, ReportView};
use uuid::Uuid;

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub avatar: Option<AvatarUpload>,
}

/// Avatar bytes travel base64-encoded in the JSON body; there is no
/// multipart upload pipeline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUpload {
    pub data: String,
    pub content_type: String,
}

/// Tags arrive either as a comma-separated string or as a JSON array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    Csv(String),
    List(Vec<String>),
}

impl TagsField {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TagsField::Csv(csv) => csv.split(',').map(|tag| tag.trim().to_string()).collect(),
            TagsField::List(tags) => tags,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Option<TagsField>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Option<TagsField>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_comment: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub reported_item_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusRequest {
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

// ── Query strings ───────────────────────────────────────────────────────────

fn page_request(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> PageRequest {
    PageRequest::new(page.unwrap_or(1), limit.unwrap_or(default_limit))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn request(&self, default_limit: u64) -> PageRequest {
        page_request(self.page, self.limit, default_limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl BlogListQuery {
    pub fn request(&self, default_limit: u64) -> PageRequest {
        page_request(self.page, self.limit, default_limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn request(&self, default_limit: u64) -> PageRequest {
        page_request(self.page, self.limit, default_limit)
    }
}

/// Admin blog listing; `status` is `published` or `draft`.
#[derive(Debug, Deserialize)]
pub struct AdminBlogQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl AdminBlogQuery {
    pub fn request(&self, default_limit: u64) -> PageRequest {
        page_request(self.page, self.limit, default_limit)
    }

    pub fn published(&self) -> Option<bool> {
        self.status.as_deref().map(|status| status == "published")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub blog_id: Option<Uuid>,
}

impl AdminCommentQuery {
    pub fn request(&self, default_limit: u64) -> PageRequest {
        page_request(self.page, self.limit, default_limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<ReportStatus>,
    #[serde(rename = "type")]
    pub report_type: Option<ReportType>,
}

impl ReportListQuery {
    pub fn request(&self, default_limit: u64) -> PageRequest {
        page_request(self.page, self.limit, default_limit)
    }
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

/// Public profile: no email, no role.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            id: user.id,
            username: user.username,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<AuthorRef>,
    pub published: bool,
    pub views: i64,
    pub likes_count: u64,
    pub is_liked: bool,
    pub read_time: i32,
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogResponse {
    pub fn new(blog: Blog, author: Option<AuthorRef>, comments_count: u64, viewer: Option<&Actor>) -> Self {
        let is_liked = viewer.is_some_and(|actor| blog.is_liked_by(actor.id));
        BlogResponse {
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            content: blog.content,
            excerpt: blog.excerpt,
            cover_image: blog.cover_image,
            tags: blog.tags,
            author,
            published: blog.published,
            views: blog.views,
            likes_count: blog.likes.len() as u64,
            is_liked,
            read_time: blog.read_time,
            comments_count,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListResponse {
    pub blogs: Vec<BlogResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_blogs: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorRef>,
    pub blog: Uuid,
    pub parent_comment: Option<Uuid>,
    pub likes_count: u64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, author: Option<AuthorRef>, viewer: Option<&Actor>) -> Self {
        let is_liked = viewer.is_some_and(|actor| comment.is_liked_by(actor.id));
        CommentResponse {
            id: comment.id,
            content: comment.content,
            author,
            blog: comment.blog,
            parent_comment: comment.parent,
            likes_count: comment.likes.len() as u64,
            is_liked,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListResponse {
    pub comments: Vec<CommentThreadResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_comments: u64,
}

/// Admin comment listing is flat; replies appear as ordinary rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_comments: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_users: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub reporter: Uuid,
    pub reported_item_id: Option<Uuid>,
    pub reported_item_model: Option<&'static str>,
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        ReportResponse {
            id: report.id,
            report_type: report.report_type(),
            reason: report.reason,
            description: report.description.clone(),
            reporter: report.reporter,
            reported_item_id: report.target.map(|t| t.id()),
            reported_item_model: report.target.map(|t| t.model()),
            status: report.status,
            admin_notes: report.admin_notes,
            reviewed_by: report.reviewed_by,
            reviewed_at: report.reviewed_at,
            resolved_at: report.resolved_at,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// Admin listing row: the report plus reporter handle and the derived
/// display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAdminResponse {
    #[serde(flatten)]
    pub report: ReportResponse,
    pub reporter_username: Option<String>,
    pub display_title: String,
    pub display_author: String,
    pub display_content: String,
}

impl From<ReportView> for ReportAdminResponse {
    fn from(view: ReportView) -> Self {
        ReportAdminResponse {
            report: ReportResponse::from(view.report),
            reporter_username: view.reporter_username,
            display_title: view.display.title,
            display_author: view.display.author,
            display_content: view.display.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<ReportAdminResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_reports: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub likes_count: u64,
    pub is_liked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_users: u64,
    pub total_blogs: u64,
    pub total_comments: u64,
    pub total_reports: u64,
    pub pending_reports: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBlog {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentReport {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub reason: ReportReason,
    pub status: ReportStatus,
    pub reporter: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub users: Vec<ProfileResponse>,
    pub blogs: Vec<RecentBlog>,
    pub reports: Vec<RecentReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardTotals,
    pub recent_activity: RecentActivity,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        DashboardResponse {
            stats: DashboardTotals {
                total_users: stats.total_users,
                total_blogs: stats.total_blogs,
                total_comments: stats.total_comments,
                total_reports: stats.total_reports,
                pending_reports: stats.pending_reports,
            },
            recent_activity: RecentActivity {
                users: stats.recent_users.into_iter().map(ProfileResponse::from).collect(),
                blogs: stats
                    .recent_blogs
                    .into_iter()
                    .map(|blog| RecentBlog {
                        id: blog.id,
                        title: blog.title,
                        author: blog.author,
                        published: blog.published,
                        created_at: blog.created_at,
                    })
                    .collect(),
                reports: stats
                    .recent_reports
                    .into_iter()
                    .map(|report| RecentReport {
                        id: report.id,
                        report_type: report.report_type(),
                        reason: report.reason,
                        status: report.status,
                        reporter: report.reporter,
                        created_at: report.created_at,
                    })
                    .collect(),
            },
        }
    }
}
