//! Pagination and filter types shared by the listing layer and the
//! repository ports.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ReportStatus, ReportType};

/// A bounded skip/limit page request. Pages are 1-based; sizes are clamped
/// to `1..=MAX_PER_PAGE` so a client cannot request the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u64 = 20;
    pub const MAX_PER_PAGE: u64 = 100;

    pub fn new(page: u64, per_page: u64) -> Self {
        PageRequest {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the pagination envelope every listing returns.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Page {
            items,
            current_page: request.page(),
            total_pages: total_count.div_ceil(request.per_page()),
            total_count,
        }
    }

    /// Re-shape the items while keeping the envelope, e.g. to attach display
    /// fields to each report.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_count: self.total_count,
        }
    }
}

/// Admin user listing filter. `search` matches username or email,
/// case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
}

/// Blog listing filter. `search` matches title, content, or any tag.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub published: Option<bool>,
    pub author: Option<Uuid>,
}

/// Admin comment listing filter. `search` matches content.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub search: Option<String>,
    pub blog: Option<Uuid>,
}

/// Report listing filter: exact-match on status and/or wire type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub report_type: Option<ReportType>,
}
