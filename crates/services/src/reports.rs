//! # Report Lifecycle Manager
//!
//! Creation, status transitions, and the admin-facing listing that resolves
//! each report's polymorphic target into human-readable display fields.
//!
//! Reports outlive their targets: a report may point at a blog, comment, or
//! user that has since been deleted. The display resolution treats that as
//! a normal state and substitutes "(Deleted)" placeholders, never an error.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Actor, Blog, BlogRepo, Comment, CommentRepo, DomainError, Page, PageRequest, Report,
    ReportFilter, ReportReason, ReportRepo, ReportStats, ReportStatus, ReportTarget, ReportType,
    Result, User, UserRepo,
};
use uuid::Uuid;

use crate::guard;

const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_ADMIN_NOTES_LEN: usize = 1000;
/// Display content is clipped to this many characters plus an ellipsis.
const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct NewReport {
    pub report_type: ReportType,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub reported_item_id: Option<Uuid>,
}

/// The three derived fields the admin dashboard renders per report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReportDisplay {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// A stored report joined with everything the admin listing shows: the
/// reporter's handle and the per-type display fields.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub report_type: ReportType,
    pub reporter_username: Option<String>,
    pub display: ReportDisplay,
}

/// What a report's target resolved to at listing time. Dispatching on this
/// enum keeps the per-type display rules exhaustive.
enum ResolvedTarget {
    General,
    Blog { blog: Blog, author: Option<User> },
    Comment { comment: Comment, blog: Option<Blog>, author: Option<User> },
    User(Box<User>),
    /// The target was deleted after the report was filed.
    Missing(ReportType),
}

#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepo>,
    blogs: Arc<dyn BlogRepo>,
    comments: Arc<dyn CommentRepo>,
    users: Arc<dyn UserRepo>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepo>,
        blogs: Arc<dyn BlogRepo>,
        comments: Arc<dyn CommentRepo>,
        users: Arc<dyn UserRepo>,
    ) -> Self {
        ReportService { reports, blogs, comments, users }
    }

    /// Files a report. Admins are rejected outright; targeted reports
    /// verify the target exists, refuse self-reports, and refuse a second
    /// report for the same (reporter, target) pair.
    pub async fn create(&self, actor: Option<&Actor>, input: NewReport) -> Result<Report> {
        let actor = guard::authorize_reporter(actor)?;

        if let Some(description) = &input.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation(format!(
                    "description must be at most {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }

        let target = self.resolve_new_target(actor, &input).await?;
        if let Some(target) = target {
            if self.reports.exists_for(actor.id, target).await? {
                return Err(DomainError::Conflict("you have already reported this item".into()));
            }
        }

        let now = Utc::now();
        let report = Report {
            id: Uuid::now_v7(),
            reason: input.reason,
            description: input.description.filter(|d| !d.trim().is_empty()),
            reporter: actor.id,
            target,
            status: ReportStatus::Pending,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        };
        let report = self.reports.insert(report).await?;
        tracing::info!(report = %report.id, kind = report.report_type().as_str(), "report filed");
        Ok(report)
    }

    /// Admin-driven status transition along the state machine. Every
    /// transition stamps the reviewer; entering `resolved` also stamps
    /// `resolved_at`.
    pub async fn update_status(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
        new_status: ReportStatus,
        admin_notes: Option<String>,
    ) -> Result<Report> {
        let admin = guard::require_admin(actor)?;
        let mut report = self
            .reports
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Report", id))?;

        if !report.status.can_transition_to(new_status) {
            return Err(DomainError::InvalidTransition { from: report.status, to: new_status });
        }
        if let Some(notes) = &admin_notes {
            if notes.chars().count() > MAX_ADMIN_NOTES_LEN {
                return Err(DomainError::Validation(format!(
                    "admin notes must be at most {MAX_ADMIN_NOTES_LEN} characters"
                )));
            }
        }

        let now = Utc::now();
        report.status = new_status;
        if let Some(notes) = admin_notes {
            report.admin_notes = Some(notes);
        }
        report.reviewed_by = Some(admin.id);
        report.reviewed_at = Some(now);
        if new_status == ReportStatus::Resolved {
            report.resolved_at = Some(now);
        }
        report.updated_at = now;
        self.reports.update(report).await
    }

    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> Result<()> {
        guard::require_admin(actor)?;
        if !self.reports.delete(id).await? {
            return Err(DomainError::not_found("Report", id));
        }
        Ok(())
    }

    /// Admin listing with display fields resolved per report. Each report
    /// costs one live target lookup; that is inherent to the polymorphic
    /// reference and bounded by the page size.
    pub async fn list_for_admin(
        &self,
        actor: Option<&Actor>,
        filter: ReportFilter,
        page: PageRequest,
    ) -> Result<Page<ReportView>> {
        guard::require_admin(actor)?;
        let reports = self.reports.list(filter, page).await?;

        let mut items = Vec::with_capacity(reports.items.len());
        for report in reports.items {
            let resolved = self.resolve_target(&report).await?;
            let display = display_fields(&report, &resolved);
            let reporter_username = self
                .users
                .find(report.reporter)
                .await?
                .map(|user| user.username);
            let report_type = report.report_type();
            items.push(ReportView { report, report_type, reporter_username, display });
        }

        Ok(Page {
            items,
            current_page: reports.current_page,
            total_pages: reports.total_pages,
            total_count: reports.total_count,
        })
    }

    pub async fn stats(&self, actor: Option<&Actor>) -> Result<ReportStats> {
        guard::require_admin(actor)?;
        self.reports.stats().await
    }

    /// Resolves and validates the target of a report being created.
    async fn resolve_new_target(
        &self,
        actor: &Actor,
        input: &NewReport,
    ) -> Result<Option<ReportTarget>> {
        if input.report_type == ReportType::General {
            return Ok(None);
        }

        let id = input.reported_item_id.ok_or_else(|| {
            DomainError::Validation("reported item ID is required for this report type".into())
        })?;

        let target = match input.report_type {
            ReportType::Article => {
                let blog = self
                    .blogs
                    .find(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Reported item", id))?;
                guard::reject_self_report(actor, blog.author, "article")?;
                ReportTarget::Blog(id)
            }
            ReportType::Comment => {
                let comment = self
                    .comments
                    .find(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Reported item", id))?;
                guard::reject_self_report(actor, comment.author, "comment")?;
                ReportTarget::Comment(id)
            }
            ReportType::User => {
                if self.users.find(id).await?.is_none() {
                    return Err(DomainError::not_found("Reported item", id));
                }
                if id == actor.id {
                    return Err(DomainError::InvalidOperation("you cannot report yourself".into()));
                }
                ReportTarget::User(id)
            }
            ReportType::General => unreachable!("general handled above"),
        };
        Ok(Some(target))
    }

    /// Fetches whatever the report points at today, dispatching on the
    /// target variant. A vanished target resolves to `Missing`, not an
    /// error.
    async fn resolve_target(&self, report: &Report) -> Result<ResolvedTarget> {
        let Some(target) = report.target else {
            return Ok(ResolvedTarget::General);
        };

        let resolved = match target {
            ReportTarget::Blog(id) => match self.blogs.find(id).await? {
                Some(blog) => {
                    let author = self.users.find(blog.author).await?;
                    ResolvedTarget::Blog { blog, author }
                }
                None => ResolvedTarget::Missing(ReportType::Article),
            },
            ReportTarget::Comment(id) => match self.comments.find(id).await? {
                Some(comment) => {
                    let blog = self.blogs.find(comment.blog).await?;
                    let author = self.users.find(comment.author).await?;
                    ResolvedTarget::Comment { comment, blog, author }
                }
                None => ResolvedTarget::Missing(ReportType::Comment),
            },
            ReportTarget::User(id) => match self.users.find(id).await? {
                Some(user) => ResolvedTarget::User(Box::new(user)),
                None => ResolvedTarget::Missing(ReportType::User),
            },
        };
        Ok(resolved)
    }
}

/// Per-type display rule, one arm per resolved variant.
fn display_fields(report: &Report, target: &ResolvedTarget) -> ReportDisplay {
    match target {
        ResolvedTarget::General => ReportDisplay {
            title: "General Complaint".to_string(),
            author: "N/A".to_string(),
            content: report
                .description
                .clone()
                .unwrap_or_else(|| "No description provided".to_string()),
        },
        ResolvedTarget::Comment { comment, blog, author } => ReportDisplay {
            title: match blog {
                Some(blog) => format!("Comment on \"{}\"", blog.title),
                None => "Comment".to_string(),
            },
            author: author
                .as_ref()
                .map(|a| a.username.clone())
                .unwrap_or_else(|| "Unknown Author".to_string()),
            content: preview(&comment.content),
        },
        ResolvedTarget::Blog { blog, author } => ReportDisplay {
            title: blog.title.clone(),
            author: author
                .as_ref()
                .map(|a| a.username.clone())
                .unwrap_or_else(|| "Unknown Author".to_string()),
            content: if blog.excerpt.is_empty() {
                preview(&blog.content)
            } else {
                blog.excerpt.clone()
            },
        },
        ResolvedTarget::User(user) => ReportDisplay {
            title: "User Profile".to_string(),
            author: user.username.clone(),
            content: user.bio.clone().unwrap_or_else(|| "No bio available".to_string()),
        },
        ResolvedTarget::Missing(kind) => deleted_display(*kind),
    }
}

/// The steady-state "target no longer exists" placeholders.
fn deleted_display(kind: ReportType) -> ReportDisplay {
    match kind {
        ReportType::Comment => ReportDisplay {
            title: "Comment (Deleted)".to_string(),
            author: "Unknown".to_string(),
            content: "Comment may have been deleted".to_string(),
        },
        ReportType::Article => ReportDisplay {
            title: "Blog Post (Deleted)".to_string(),
            author: "Unknown".to_string(),
            content: "Blog post may have been deleted".to_string(),
        },
        ReportType::User => ReportDisplay {
            title: "User Profile (Deleted)".to_string(),
            author: "Unknown".to_string(),
            content: "User may have been deleted".to_string(),
        },
        ReportType::General => ReportDisplay {
            title: "Unknown Item".to_string(),
            author: "Unknown".to_string(),
            content: "Item may have been deleted".to_string(),
        },
    }
}

fn preview(content: &str) -> String {
    let clipped: String = content.chars().take(PREVIEW_LEN).collect();
    format!("{clipped}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(target: Option<ReportTarget>) -> Report {
        let now = Utc::now();
        Report {
            id: Uuid::now_v7(),
            reason: ReportReason::Spam,
            description: Some("looks automated".to_string()),
            reporter: Uuid::now_v7(),
            target,
            status: ReportStatus::Pending,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn general_reports_render_their_description() {
        let report = sample_report(None);
        let display = display_fields(&report, &ResolvedTarget::General);
        assert_eq!(display.title, "General Complaint");
        assert_eq!(display.author, "N/A");
        assert_eq!(display.content, "looks automated");
    }

    #[test]
    fn missing_targets_render_deleted_placeholders() {
        let report = sample_report(Some(ReportTarget::Comment(Uuid::now_v7())));
        let display = display_fields(&report, &ResolvedTarget::Missing(ReportType::Comment));
        assert!(display.title.contains("(Deleted)"));
        assert_eq!(display.content, "Comment may have been deleted");
    }

    #[test]
    fn preview_clips_long_content() {
        let long = "x".repeat(250);
        let display = preview(&long);
        assert_eq!(display.chars().count(), PREVIEW_LEN + 3);
        assert!(display.ends_with("..."));
        assert_eq!(preview("short"), "short...");
    }
}
