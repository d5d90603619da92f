//! Admin dashboard aggregation: entity totals plus a short recent-activity
//! feed.

use std::sync::Arc;

use domains::{
    Actor, Blog, BlogRepo, CommentRepo, Report, ReportRepo, ReportStatus, Result, User, UserRepo,
};

use crate::guard;

const RECENT_LIMIT: u64 = 5;

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_blogs: u64,
    pub total_comments: u64,
    pub total_reports: u64,
    pub pending_reports: u64,
    pub recent_users: Vec<User>,
    pub recent_blogs: Vec<Blog>,
    pub recent_reports: Vec<Report>,
}

#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserRepo>,
    blogs: Arc<dyn BlogRepo>,
    comments: Arc<dyn CommentRepo>,
    reports: Arc<dyn ReportRepo>,
}

impl DashboardService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        blogs: Arc<dyn BlogRepo>,
        comments: Arc<dyn CommentRepo>,
        reports: Arc<dyn ReportRepo>,
    ) -> Self {
        DashboardService { users, blogs, comments, reports }
    }

    pub async fn overview(&self, actor: Option<&Actor>) -> Result<DashboardStats> {
        guard::require_admin(actor)?;

        Ok(DashboardStats {
            total_users: self.users.count().await?,
            total_blogs: self.blogs.count().await?,
            total_comments: self.comments.count().await?,
            total_reports: self.reports.count().await?,
            pending_reports: self.reports.count_by_status(ReportStatus::Pending).await?,
            recent_users: self.users.recent(RECENT_LIMIT).await?,
            recent_blogs: self.blogs.recent(RECENT_LIMIT).await?,
            recent_reports: self.reports.recent(RECENT_LIMIT).await?,
        })
    }
}
