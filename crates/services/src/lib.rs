//! # services
//!
//! The application core: authorization guard, slug and read-time helpers,
//! the per-entity services, the cascade deletion engine, and the report
//! lifecycle manager. Everything talks to storage through the ports in
//! `domains`; nothing here knows which backend is wired in.

pub mod blogs;
pub mod cascade;
pub mod comments;
pub mod dashboard;
pub mod guard;
pub mod reports;
pub mod slug;
pub mod users;

pub use blogs::{BlogService, BlogUpdate, NewBlog};
pub use cascade::CascadeEngine;
pub use comments::{CommentService, CommentThread};
pub use dashboard::{DashboardService, DashboardStats};
pub use guard::Action;
pub use reports::{NewReport, ReportDisplay, ReportService, ReportView};
pub use users::{AuthSession, Registration, UserService};
