//! Shared handler state: the wired service layer plus the two repos the
//! response shaping needs directly (author names, comment counts).

use std::sync::Arc;

use domains::{CommentRepo, UserRepo};
use services::{BlogService, CommentService, DashboardService, ReportService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub blogs: BlogService,
    pub comments: CommentService,
    pub reports: ReportService,
    pub dashboard: DashboardService,
    pub user_repo: Arc<dyn UserRepo>,
    pub comment_repo: Arc<dyn CommentRepo>,
}
