//! Blog authoring, publishing, likes, and listing.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Actor, Blog, BlogFilter, BlogRepo, DomainError, LikeOutcome, Page, PageRequest, Result,
};
use uuid::Uuid;

use crate::cascade::CascadeEngine;
use crate::guard;
use crate::slug::{read_time, slugify};

const MAX_TITLE_LEN: usize = 200;
const MAX_EXCERPT_LEN: usize = 300;
/// Bound on slug-collision retries; past this the title space is considered
/// exhausted and the create fails with `Conflict`.
const SLUG_RETRY_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
}

/// Partial update; absent fields keep their current value. An empty
/// `cover_image` string clears the image.
#[derive(Debug, Clone, Default)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct BlogService {
    blogs: Arc<dyn BlogRepo>,
    cascade: CascadeEngine,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogRepo>, cascade: CascadeEngine) -> Self {
        BlogService { blogs, cascade }
    }

    /// Creates a blog for the acting user. The slug is derived from the
    /// title; on a uniqueness conflict the store reports `Conflict` and we
    /// retry with `-1`, `-2`, … suffixes until an insert lands.
    pub async fn create(&self, actor: Option<&Actor>, input: NewBlog) -> Result<Blog> {
        let actor = guard::require_actor(actor)?;
        validate_fields(&input.title, &input.content, &input.excerpt)?;

        let now = Utc::now();
        let base = slugify(&input.title);
        let mut blog = Blog {
            id: Uuid::now_v7(),
            title: input.title.trim().to_string(),
            slug: base.clone(),
            read_time: read_time(&input.content),
            content: input.content,
            excerpt: input.excerpt,
            cover_image: input.cover_image.filter(|url| !url.is_empty()),
            tags: normalize_tags(input.tags),
            author: actor.id,
            published: input.published,
            views: 0,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut counter = 0;
        loop {
            match self.blogs.insert(blog.clone()).await {
                Ok(saved) => {
                    tracing::debug!(blog = %saved.id, slug = %saved.slug, "blog created");
                    return Ok(saved);
                }
                Err(DomainError::Conflict(_)) if counter < SLUG_RETRY_LIMIT => {
                    counter += 1;
                    blog.slug = format!("{base}-{counter}");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Public read path: looks up by slug and bumps the view counter.
    /// Drafts are only visible to their author and admins, and draft reads
    /// never count as views.
    pub async fn get_by_slug(&self, actor: Option<&Actor>, slug: &str) -> Result<Blog> {
        let mut blog = self
            .blogs
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Blog", slug))?;

        if !guard::can_view_blog(actor, blog.author, blog.published) {
            return Err(DomainError::not_found("Blog", slug));
        }

        if blog.published {
            self.blogs.increment_views(blog.id).await?;
            blog.views += 1;
        }
        Ok(blog)
    }

    /// Edit-form read path: by id, author or admin only, no view bump.
    pub async fn get_for_edit(&self, actor: Option<&Actor>, id: Uuid) -> Result<Blog> {
        let blog = self.blogs.find(id).await?.ok_or_else(|| DomainError::not_found("Blog", id))?;
        guard::authorize_mutation(actor, blog.author, "blog")?;
        Ok(blog)
    }

    /// Applies a partial update. The slug never changes after creation;
    /// read time is recomputed whenever the content does.
    pub async fn update(&self, actor: Option<&Actor>, id: Uuid, changes: BlogUpdate) -> Result<Blog> {
        let mut blog = self.blogs.find(id).await?.ok_or_else(|| DomainError::not_found("Blog", id))?;
        guard::authorize_mutation(actor, blog.author, "blog")?;

        if let Some(title) = changes.title {
            blog.title = title.trim().to_string();
        }
        if let Some(content) = changes.content {
            blog.read_time = read_time(&content);
            blog.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            blog.excerpt = excerpt;
        }
        if let Some(cover_image) = changes.cover_image {
            blog.cover_image = Some(cover_image).filter(|url| !url.is_empty());
        }
        if let Some(tags) = changes.tags {
            blog.tags = normalize_tags(tags);
        }
        if let Some(published) = changes.published {
            blog.published = published;
        }
        validate_fields(&blog.title, &blog.content, &blog.excerpt)?;

        blog.updated_at = Utc::now();
        self.blogs.update(blog).await
    }

    /// Author/admin deletion; dependents go through the cascade engine.
    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> Result<()> {
        let blog = self.blogs.find(id).await?.ok_or_else(|| DomainError::not_found("Blog", id))?;
        guard::authorize_mutation(actor, blog.author, "blog")?;
        self.cascade.delete_blog(id).await
    }

    /// Atomic like toggle, returning the new membership and count.
    pub async fn toggle_like(&self, actor: Option<&Actor>, id: Uuid) -> Result<LikeOutcome> {
        let actor = guard::require_actor(actor)?;
        self.blogs
            .toggle_like(id, actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Blog", id))
    }

    /// Public listing: published blogs only, optional search and tag filter.
    pub async fn list_published(
        &self,
        search: Option<String>,
        tag: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Blog>> {
        let filter = BlogFilter { search, tag, published: Some(true), author: None };
        self.blogs.list(filter, page).await
    }

    /// The acting user's own blogs, drafts included.
    pub async fn list_mine(&self, actor: Option<&Actor>, page: PageRequest) -> Result<Page<Blog>> {
        let actor = guard::require_actor(actor)?;
        let filter = BlogFilter { author: Some(actor.id), ..BlogFilter::default() };
        self.blogs.list(filter, page).await
    }

    /// Admin listing over all blogs with optional search and publish-state
    /// filter.
    pub async fn list_admin(
        &self,
        actor: Option<&Actor>,
        search: Option<String>,
        published: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<Blog>> {
        guard::require_admin(actor)?;
        let filter = BlogFilter { search, tag: None, published, author: None };
        self.blogs.list(filter, page).await
    }

    /// Admin deletion entry point; the ownership check is bypassed by role.
    pub async fn delete_as_admin(&self, actor: Option<&Actor>, id: Uuid) -> Result<()> {
        guard::require_admin(actor)?;
        self.cascade.delete_blog(id).await
    }
}

fn validate_fields(title: &str, content: &str, excerpt: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if content.trim().is_empty() {
        return Err(DomainError::Validation("content is required".into()));
    }
    if excerpt.trim().is_empty() {
        return Err(DomainError::Validation("excerpt is required".into()));
    }
    if excerpt.chars().count() > MAX_EXCERPT_LEN {
        return Err(DomainError::Validation(format!(
            "excerpt must be at most {MAX_EXCERPT_LEN} characters"
        )));
    }
    Ok(())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{Actor, MockBlogRepo, MockCommentRepo, MockReportRepo, MockUserRepo, Role};

    fn engine_with(blogs: Arc<dyn BlogRepo>) -> CascadeEngine {
        CascadeEngine::new(
            Arc::new(MockUserRepo::new()),
            blogs,
            Arc::new(MockCommentRepo::new()),
            Arc::new(MockReportRepo::new()),
        )
    }

    fn input(title: &str) -> NewBlog {
        NewBlog {
            title: title.to_string(),
            content: "words".to_string(),
            excerpt: "e".to_string(),
            cover_image: None,
            tags: vec![],
            published: true,
        }
    }

    #[tokio::test]
    async fn slug_conflicts_retry_with_numeric_suffixes() {
        let mut blogs = MockBlogRepo::new();
        let mut seq = mockall::Sequence::new();
        blogs
            .expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::Conflict("slug is already taken".into())));
        blogs
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|blog| Ok(blog));

        let blogs: Arc<dyn BlogRepo> = Arc::new(blogs);
        let service = BlogService::new(blogs.clone(), engine_with(blogs));
        let actor = Actor { id: Uuid::now_v7(), role: Role::User };

        let blog = service.create(Some(&actor), input("My Post")).await.unwrap();
        assert_eq!(blog.slug, "my-post-2");
    }

    #[tokio::test]
    async fn non_conflict_errors_do_not_retry() {
        let mut blogs = MockBlogRepo::new();
        blogs
            .expect_insert()
            .times(1)
            .returning(|_| Err(DomainError::Internal("pool gone".into())));

        let blogs: Arc<dyn BlogRepo> = Arc::new(blogs);
        let service = BlogService::new(blogs.clone(), engine_with(blogs));
        let actor = Actor { id: Uuid::now_v7(), role: Role::User };

        let err = service.create(Some(&actor), input("My Post")).await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
