//! # In-memory store
//!
//! `DashMap`-backed implementation of every repository port. Uniqueness
//! (username, email, slug) is enforced through dedicated index maps whose
//! `entry` API makes the check-and-claim a single atomic step, and like
//! toggles mutate the record under its shard lock, so the concurrency
//! contract matches the Postgres adapter.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    Blog, BlogFilter, BlogRepo, Comment, CommentFilter, CommentRepo, CountBucket, DomainError,
    LikeOutcome, Page, PageRequest, Report, ReportFilter, ReportRepo, ReportStats, ReportStatus,
    ReportTarget, Result, User, UserFilter, UserRepo,
};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    blogs: DashMap<Uuid, Blog>,
    comments: DashMap<Uuid, Comment>,
    reports: DashMap<Uuid, Report>,
    // Uniqueness indexes; values are the owning record's id.
    usernames: DashMap<String, Uuid>,
    emails: DashMap<String, Uuid>,
    slugs: DashMap<String, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

/// Sorts newest first and cuts the requested window out of `items`.
fn paginate<T>(mut items: Vec<T>, page: PageRequest, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Page<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    let total = items.len() as u64;
    let window: Vec<T> = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.per_page() as usize)
        .collect();
    Page::new(window, total, page)
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn toggle(likes: &mut Vec<Uuid>, user: Uuid) -> LikeOutcome {
    let is_liked = match likes.iter().position(|id| *id == user) {
        Some(index) => {
            likes.remove(index);
            false
        }
        None => {
            likes.push(user);
            true
        }
    };
    LikeOutcome { is_liked, likes_count: likes.len() as u64 }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, user: User) -> Result<User> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => return Err(DomainError::Conflict("username is already taken".into())),
            Entry::Vacant(slot) => slot.insert(user.id),
        };
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&user.username);
                return Err(DomainError::Conflict("email is already registered".into()));
            }
            Entry::Vacant(slot) => slot.insert(user.id),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let id = self.usernames.get(username).map(|entry| *entry);
        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let id = self.emails.get(email).map(|entry| *entry);
        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }

    async fn update(&self, user: User) -> Result<User> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.usernames.remove(&user.username);
                self.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> Result<Page<User>> {
        let items: Vec<User> = self
            .users
            .iter()
            .filter(|entry| match &filter.search {
                Some(term) => matches(&entry.username, term) || matches(&entry.email, term),
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(paginate(items, page, |u| u.created_at))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.len() as u64)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>> {
        let mut items: Vec<User> = self.users.iter().map(|entry| entry.value().clone()).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit as usize);
        Ok(items)
    }
}

#[async_trait]
impl BlogRepo for MemoryStore {
    async fn insert(&self, blog: Blog) -> Result<Blog> {
        match self.slugs.entry(blog.slug.clone()) {
            Entry::Occupied(_) => return Err(DomainError::Conflict("slug is already taken".into())),
            Entry::Vacant(slot) => slot.insert(blog.id),
        };
        self.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Blog>> {
        Ok(self.blogs.get(&id).map(|b| b.value().clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        let id = self.slugs.get(slug).map(|entry| *entry);
        Ok(id.and_then(|id| self.blogs.get(&id).map(|b| b.value().clone())))
    }

    async fn update(&self, blog: Blog) -> Result<Blog> {
        match self.blogs.get_mut(&blog.id) {
            Some(mut existing) => {
                // views and likes stay under atomic management; an update
                // carries stale copies of both.
                let views = existing.views;
                let likes = std::mem::take(&mut existing.likes);
                *existing = Blog { views, likes, ..blog };
                Ok(existing.value().clone())
            }
            None => Err(DomainError::not_found("Blog", blog.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        match self.blogs.remove(&id) {
            Some((_, blog)) => {
                self.slugs.remove(&blog.slug);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, filter: BlogFilter, page: PageRequest) -> Result<Page<Blog>> {
        let items: Vec<Blog> = self
            .blogs
            .iter()
            .filter(|blog| {
                if let Some(published) = filter.published {
                    if blog.published != published {
                        return false;
                    }
                }
                if let Some(author) = filter.author {
                    if blog.author != author {
                        return false;
                    }
                }
                if let Some(tag) = &filter.tag {
                    if !blog.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }
                if let Some(term) = &filter.search {
                    return matches(&blog.title, term)
                        || matches(&blog.content, term)
                        || blog.tags.iter().any(|t| matches(t, term));
                }
                true
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(paginate(items, page, |b| b.created_at))
    }

    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<LikeOutcome>> {
        Ok(self.blogs.get_mut(&id).map(|mut blog| toggle(&mut blog.likes, user)))
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        if let Some(mut blog) = self.blogs.get_mut(&id) {
            blog.views += 1;
        }
        Ok(())
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<u64> {
        let ids: Vec<Uuid> = self
            .blogs
            .iter()
            .filter(|blog| blog.author == author)
            .map(|blog| blog.id)
            .collect();
        for id in &ids {
            if let Some((_, blog)) = self.blogs.remove(id) {
                self.slugs.remove(&blog.slug);
            }
        }
        Ok(ids.len() as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.blogs.len() as u64)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Blog>> {
        let mut items: Vec<Blog> = self.blogs.iter().map(|entry| entry.value().clone()).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit as usize);
        Ok(items)
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn insert(&self, comment: Comment) -> Result<Comment> {
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.value().clone()))
    }

    async fn update(&self, comment: Comment) -> Result<Comment> {
        match self.comments.get_mut(&comment.id) {
            Some(mut existing) => {
                let likes = std::mem::take(&mut existing.likes);
                *existing = Comment { likes, ..comment };
                Ok(existing.value().clone())
            }
            None => Err(DomainError::not_found("Comment", comment.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.comments.remove(&id).is_some())
    }

    async fn list(&self, filter: CommentFilter, page: PageRequest) -> Result<Page<Comment>> {
        let items: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| {
                if let Some(blog) = filter.blog {
                    if comment.blog != blog {
                        return false;
                    }
                }
                match &filter.search {
                    Some(term) => matches(&comment.content, term),
                    None => true,
                }
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(paginate(items, page, |c| c.created_at))
    }

    async fn list_top_level(&self, blog: Uuid, page: PageRequest) -> Result<Page<Comment>> {
        let items: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| comment.blog == blog && comment.parent.is_none())
            .map(|entry| entry.value().clone())
            .collect();
        Ok(paginate(items, page, |c| c.created_at))
    }

    async fn replies_of(&self, parent: Uuid) -> Result<Vec<Comment>> {
        let mut replies: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| comment.parent == Some(parent))
            .map(|entry| entry.value().clone())
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(replies)
    }

    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<LikeOutcome>> {
        Ok(self.comments.get_mut(&id).map(|mut comment| toggle(&mut comment.likes, user)))
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<u64> {
        let before = self.comments.len();
        self.comments.retain(|_, comment| comment.author != author);
        Ok((before - self.comments.len()) as u64)
    }

    async fn delete_by_blog(&self, blog: Uuid) -> Result<u64> {
        let before = self.comments.len();
        self.comments.retain(|_, comment| comment.blog != blog);
        Ok((before - self.comments.len()) as u64)
    }

    async fn delete_replies(&self, parent: Uuid) -> Result<u64> {
        let before = self.comments.len();
        self.comments.retain(|_, comment| comment.parent != Some(parent));
        Ok((before - self.comments.len()) as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.comments.len() as u64)
    }

    async fn count_for_blog(&self, blog: Uuid) -> Result<u64> {
        Ok(self.comments.iter().filter(|comment| comment.blog == blog).count() as u64)
    }
}

#[async_trait]
impl ReportRepo for MemoryStore {
    async fn insert(&self, report: Report) -> Result<Report> {
        self.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.get(&id).map(|r| r.value().clone()))
    }

    async fn update(&self, report: Report) -> Result<Report> {
        self.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.reports.remove(&id).is_some())
    }

    async fn list(&self, filter: ReportFilter, page: PageRequest) -> Result<Page<Report>> {
        let items: Vec<Report> = self
            .reports
            .iter()
            .filter(|report| {
                if let Some(status) = filter.status {
                    if report.status != status {
                        return false;
                    }
                }
                if let Some(kind) = filter.report_type {
                    if report.report_type() != kind {
                        return false;
                    }
                }
                true
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(paginate(items, page, |r| r.created_at))
    }

    async fn exists_for(&self, reporter: Uuid, target: ReportTarget) -> Result<bool> {
        Ok(self
            .reports
            .iter()
            .any(|report| report.reporter == reporter && report.target == Some(target)))
    }

    async fn delete_by_reporter(&self, reporter: Uuid) -> Result<u64> {
        let before = self.reports.len();
        self.reports.retain(|_, report| report.reporter != reporter);
        Ok((before - self.reports.len()) as u64)
    }

    async fn delete_by_target(&self, target: ReportTarget) -> Result<u64> {
        let before = self.reports.len();
        self.reports.retain(|_, report| report.target != Some(target));
        Ok((before - self.reports.len()) as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.reports.len() as u64)
    }

    async fn count_by_status(&self, status: ReportStatus) -> Result<u64> {
        Ok(self.reports.iter().filter(|report| report.status == status).count() as u64)
    }

    async fn stats(&self) -> Result<ReportStats> {
        use std::collections::BTreeMap;
        let mut by_status: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut by_type: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut by_reason: BTreeMap<&'static str, u64> = BTreeMap::new();
        for report in self.reports.iter() {
            *by_status.entry(report.status.as_str()).or_default() += 1;
            *by_type.entry(report.report_type().as_str()).or_default() += 1;
            *by_reason.entry(report.reason.as_str()).or_default() += 1;
        }
        let buckets = |map: BTreeMap<&'static str, u64>| {
            map.into_iter()
                .map(|(key, count)| CountBucket { key: key.to_string(), count })
                .collect()
        };
        Ok(ReportStats {
            by_status: buckets(by_status),
            by_type: buckets(by_type),
            by_reason: buckets(by_reason),
        })
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Report>> {
        let mut items: Vec<Report> = self.reports.iter().map(|entry| entry.value().clone()).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit as usize);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::Role;

    fn user(name: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
            role: Role::User,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected_atomically() {
        let store = MemoryStore::new();
        UserRepo::insert(&store, user("dup")).await.unwrap();
        let err = UserRepo::insert(&store, user("dup")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(UserRepo::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn like_toggle_is_a_membership_flip() {
        let store = MemoryStore::new();
        let author = Uuid::now_v7();
        let now = Utc::now();
        let blog = Blog {
            id: Uuid::now_v7(),
            title: "t".into(),
            slug: "t".into(),
            content: "c".into(),
            excerpt: "e".into(),
            cover_image: None,
            tags: vec![],
            author,
            published: true,
            views: 0,
            likes: vec![],
            read_time: 1,
            created_at: now,
            updated_at: now,
        };
        let blog = BlogRepo::insert(&store, blog).await.unwrap();

        let fan = Uuid::now_v7();
        let first = BlogRepo::toggle_like(&store, blog.id, fan).await.unwrap().unwrap();
        assert!(first.is_liked);
        assert_eq!(first.likes_count, 1);
        let second = BlogRepo::toggle_like(&store, blog.id, fan).await.unwrap().unwrap();
        assert!(!second.is_liked);
        assert_eq!(second.likes_count, 0);
    }
}
