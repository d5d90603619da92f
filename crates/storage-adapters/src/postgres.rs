//! # Postgres store
//!
//! `sqlx` implementation of the repository ports. Queries are bound at
//! runtime, so compiling does not need a live database; dynamic filters go
//! through `QueryBuilder`. Like sets live in join tables and are toggled in
//! a short transaction (conditional insert-or-delete), never read-modified
//! in application code.

use async_trait::async_trait;
use domains::{
    Avatar, Blog, BlogFilter, BlogRepo, Comment, CommentFilter, CommentRepo, CountBucket,
    DomainError, LikeOutcome, Page, PageRequest, Report, ReportFilter, ReportReason, ReportRepo,
    ReportStats, ReportStatus, ReportTarget, ReportType, Result, Role, User, UserFilter, UserRepo,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(PgStore { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Unique violations surface as `Conflict` (slug/username/email claims race
/// through here); everything else is an internal failure.
fn map_sqlx(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return DomainError::Conflict(db.message().to_string());
        }
    }
    tracing::error!(error = %err, "postgres operation failed");
    DomainError::Internal(err.to_string())
}

fn parse_role(raw: &str) -> Result<Role> {
    match raw {
        "user" => Ok(Role::User),
        "admin" => Ok(Role::Admin),
        other => Err(DomainError::Internal(format!("unknown role '{other}' in store"))),
    }
}

fn parse_status(raw: &str) -> Result<ReportStatus> {
    match raw {
        "pending" => Ok(ReportStatus::Pending),
        "reviewed" => Ok(ReportStatus::Reviewed),
        "resolved" => Ok(ReportStatus::Resolved),
        "dismissed" => Ok(ReportStatus::Dismissed),
        other => Err(DomainError::Internal(format!("unknown report status '{other}' in store"))),
    }
}

fn parse_reason(raw: &str) -> Result<ReportReason> {
    match raw {
        "spam" => Ok(ReportReason::Spam),
        "harassment" => Ok(ReportReason::Harassment),
        "inappropriate_content" => Ok(ReportReason::InappropriateContent),
        "copyright_violation" => Ok(ReportReason::CopyrightViolation),
        "misinformation" => Ok(ReportReason::Misinformation),
        "hate_speech" => Ok(ReportReason::HateSpeech),
        "other" => Ok(ReportReason::Other),
        other => Err(DomainError::Internal(format!("unknown report reason '{other}' in store"))),
    }
}

fn row_to_user(row: &PgRow) -> Result<User> {
    let avatar = match (
        row.get::<Option<Vec<u8>>, _>("avatar"),
        row.get::<Option<String>, _>("avatar_content_type"),
    ) {
        (Some(data), Some(content_type)) => Some(Avatar { data, content_type }),
        _ => None,
    };
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: parse_role(row.get("role"))?,
        bio: row.get("bio"),
        avatar,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const BLOG_COLS: &str = "b.id, b.title, b.slug, b.content, b.excerpt, b.cover_image, b.tags, \
     b.author, b.published, b.views, b.read_time, b.created_at, b.updated_at, \
     COALESCE(ARRAY_AGG(l.user_id) FILTER (WHERE l.user_id IS NOT NULL), ARRAY[]::uuid[]) AS likes";

fn row_to_blog(row: &PgRow) -> Result<Blog> {
    Ok(Blog {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        cover_image: row.get("cover_image"),
        tags: row.get("tags"),
        author: row.get("author"),
        published: row.get("published"),
        views: row.get("views"),
        likes: row.get("likes"),
        read_time: row.get("read_time"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const COMMENT_COLS: &str = "c.id, c.content, c.author, c.blog, c.parent, c.created_at, c.updated_at, \
     COALESCE(ARRAY_AGG(l.user_id) FILTER (WHERE l.user_id IS NOT NULL), ARRAY[]::uuid[]) AS likes";

fn row_to_comment(row: &PgRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        content: row.get("content"),
        author: row.get("author"),
        blog: row.get("blog"),
        parent: row.get("parent"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_report(row: &PgRow) -> Result<Report> {
    let target = match (
        row.get::<Option<Uuid>, _>("reported_item_id"),
        row.get::<Option<String>, _>("reported_item_model"),
    ) {
        (Some(id), Some(model)) => Some(ReportTarget::from_model(&model, id).ok_or_else(|| {
            DomainError::Internal(format!("unknown report target model '{model}' in store"))
        })?),
        _ => None,
    };
    Ok(Report {
        id: row.get("id"),
        reason: parse_reason(row.get("reason"))?,
        description: row.get("description"),
        reporter: row.get("reporter"),
        target,
        status: parse_status(row.get("status"))?,
        admin_notes: row.get("admin_notes"),
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
        resolved_at: row.get("resolved_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    qb.push(" LIMIT ");
    qb.push_bind(page.per_page() as i64);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset() as i64);
}

#[async_trait]
impl UserRepo for PgStore {
    async fn insert(&self, user: User) -> Result<User> {
        let (avatar, avatar_ct) = avatar_columns(&user.avatar);
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, bio, avatar, \
             avatar_content_type, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.bio)
        .bind(avatar)
        .bind(avatar_ct)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    async fn update(&self, user: User) -> Result<User> {
        let (avatar, avatar_ct) = avatar_columns(&user.avatar);
        sqlx::query(
            "UPDATE users SET username = $2, email = $3, password_hash = $4, role = $5, \
             bio = $6, avatar = $7, avatar_content_type = $8, updated_at = $9 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.bio)
        .bind(avatar)
        .bind(avatar_ct)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected() > 0)
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> Result<Page<User>> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
        push_user_filters(&mut count_qb, &filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut qb = QueryBuilder::new("SELECT * FROM users WHERE 1=1");
        push_user_filters(&mut qb, &filter);
        qb.push(" ORDER BY created_at DESC");
        push_page(&mut qb, page);
        let rows = qb.build().fetch_all(&self.pool).await.map_err(map_sqlx)?;
        let items = rows.iter().map(row_to_user).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total as u64, page))
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.iter().map(row_to_user).collect()
    }
}

fn avatar_columns(avatar: &Option<Avatar>) -> (Option<&[u8]>, Option<&str>) {
    match avatar {
        Some(a) => (Some(a.data.as_slice()), Some(a.content_type.as_str())),
        None => (None, None),
    }
}

fn like_pattern(term: &str) -> String {
    format!("%{term}%")
}

fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        qb.push(" AND (username ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR email ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

fn push_comment_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CommentFilter) {
    if let Some(blog) = filter.blog {
        qb.push(" AND c.blog = ");
        qb.push_bind(blog);
    }
    if let Some(term) = &filter.search {
        qb.push(" AND c.content ILIKE ");
        qb.push_bind(like_pattern(term));
    }
}

fn push_blog_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &BlogFilter) {
    if let Some(published) = filter.published {
        qb.push(" AND b.published = ");
        qb.push_bind(published);
    }
    if let Some(author) = filter.author {
        qb.push(" AND b.author = ");
        qb.push_bind(author);
    }
    if let Some(tag) = &filter.tag {
        qb.push(" AND ");
        qb.push_bind(tag.clone());
        qb.push(" = ANY(b.tags)");
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        qb.push(" AND (b.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR b.content ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR EXISTS (SELECT 1 FROM UNNEST(b.tags) AS t WHERE t ILIKE ");
        qb.push_bind(pattern);
        qb.push("))");
    }
}

#[async_trait]
impl BlogRepo for PgStore {
    async fn insert(&self, blog: Blog) -> Result<Blog> {
        sqlx::query(
            "INSERT INTO blogs (id, title, slug, content, excerpt, cover_image, tags, author, \
             published, views, read_time, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.slug)
        .bind(&blog.content)
        .bind(&blog.excerpt)
        .bind(&blog.cover_image)
        .bind(&blog.tags)
        .bind(blog.author)
        .bind(blog.published)
        .bind(blog.views)
        .bind(blog.read_time)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(blog)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Blog>> {
        let sql = format!(
            "SELECT {BLOG_COLS} FROM blogs b LEFT JOIN blog_likes l ON l.blog_id = b.id \
             WHERE b.id = $1 GROUP BY b.id"
        );
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_blog(&row))
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        let sql = format!(
            "SELECT {BLOG_COLS} FROM blogs b LEFT JOIN blog_likes l ON l.blog_id = b.id \
             WHERE b.slug = $1 GROUP BY b.id"
        );
        sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_blog(&row))
            .transpose()
    }

    async fn update(&self, blog: Blog) -> Result<Blog> {
        sqlx::query(
            "UPDATE blogs SET title = $2, content = $3, excerpt = $4, cover_image = $5, \
             tags = $6, published = $7, read_time = $8, updated_at = $9 WHERE id = $1",
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(&blog.excerpt)
        .bind(&blog.cover_image)
        .bind(&blog.tags)
        .bind(blog.published)
        .bind(blog.read_time)
        .bind(blog.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected() > 0)
    }

    async fn list(&self, filter: BlogFilter, page: PageRequest) -> Result<Page<Blog>> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM blogs b WHERE 1=1");
        push_blog_filters(&mut count_qb, &filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut qb = QueryBuilder::new(format!(
            "SELECT {BLOG_COLS} FROM blogs b LEFT JOIN blog_likes l ON l.blog_id = b.id WHERE 1=1"
        ));
        push_blog_filters(&mut qb, &filter);
        qb.push(" GROUP BY b.id ORDER BY b.created_at DESC");
        push_page(&mut qb, page);
        let rows = qb.build().fetch_all(&self.pool).await.map_err(map_sqlx)?;
        let items = rows.iter().map(row_to_blog).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total as u64, page))
    }

    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<LikeOutcome>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM blogs WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if !exists {
            return Ok(None);
        }

        let inserted = sqlx::query(
            "INSERT INTO blog_likes (blog_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        let is_liked = if inserted == 0 {
            sqlx::query("DELETE FROM blog_likes WHERE blog_id = $1 AND user_id = $2")
                .bind(id)
                .bind(user)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
            false
        } else {
            true
        };

        let likes_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_likes WHERE blog_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(Some(LikeOutcome { is_liked, likes_count: likes_count as u64 }))
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE blogs SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<u64> {
        let done = sqlx::query("DELETE FROM blogs WHERE author = $1")
            .bind(author)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Blog>> {
        let sql = format!(
            "SELECT {BLOG_COLS} FROM blogs b LEFT JOIN blog_likes l ON l.blog_id = b.id \
             GROUP BY b.id ORDER BY b.created_at DESC LIMIT $1"
        );
        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.iter().map(row_to_blog).collect()
    }
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn insert(&self, comment: Comment) -> Result<Comment> {
        sqlx::query(
            "INSERT INTO comments (id, content, author, blog, parent, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.author)
        .bind(comment.blog)
        .bind(comment.parent)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(comment)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLS} FROM comments c LEFT JOIN comment_likes l ON l.comment_id = c.id \
             WHERE c.id = $1 GROUP BY c.id"
        );
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_comment(&row))
            .transpose()
    }

    async fn update(&self, comment: Comment) -> Result<Comment> {
        sqlx::query("UPDATE comments SET content = $2, updated_at = $3 WHERE id = $1")
            .bind(comment.id)
            .bind(&comment.content)
            .bind(comment.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected() > 0)
    }

    async fn list(&self, filter: CommentFilter, page: PageRequest) -> Result<Page<Comment>> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM comments c WHERE 1=1");
        push_comment_filters(&mut count_qb, &filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut qb = QueryBuilder::new(format!(
            "SELECT {COMMENT_COLS} FROM comments c \
             LEFT JOIN comment_likes l ON l.comment_id = c.id WHERE 1=1"
        ));
        push_comment_filters(&mut qb, &filter);
        qb.push(" GROUP BY c.id ORDER BY c.created_at DESC");
        push_page(&mut qb, page);
        let rows = qb.build().fetch_all(&self.pool).await.map_err(map_sqlx)?;
        let items = rows.iter().map(row_to_comment).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total as u64, page))
    }

    async fn list_top_level(&self, blog: Uuid, page: PageRequest) -> Result<Page<Comment>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE blog = $1 AND parent IS NULL",
        )
        .bind(blog)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let sql = format!(
            "SELECT {COMMENT_COLS} FROM comments c \
             LEFT JOIN comment_likes l ON l.comment_id = c.id \
             WHERE c.blog = $1 AND c.parent IS NULL \
             GROUP BY c.id ORDER BY c.created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(blog)
            .bind(page.per_page() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        let items = rows.iter().map(row_to_comment).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total as u64, page))
    }

    async fn replies_of(&self, parent: Uuid) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLS} FROM comments c \
             LEFT JOIN comment_likes l ON l.comment_id = c.id \
             WHERE c.parent = $1 GROUP BY c.id ORDER BY c.created_at ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(parent)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.iter().map(row_to_comment).collect()
    }

    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<LikeOutcome>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        if !exists {
            return Ok(None);
        }

        let inserted = sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        let is_liked = if inserted == 0 {
            sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
                .bind(id)
                .bind(user)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
            false
        } else {
            true
        };

        let likes_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(Some(LikeOutcome { is_liked, likes_count: likes_count as u64 }))
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<u64> {
        let done = sqlx::query("DELETE FROM comments WHERE author = $1")
            .bind(author)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected())
    }

    async fn delete_by_blog(&self, blog: Uuid) -> Result<u64> {
        let done = sqlx::query("DELETE FROM comments WHERE blog = $1")
            .bind(blog)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected())
    }

    async fn delete_replies(&self, parent: Uuid) -> Result<u64> {
        let done = sqlx::query("DELETE FROM comments WHERE parent = $1")
            .bind(parent)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }

    async fn count_for_blog(&self, blog: Uuid) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE blog = $1")
            .bind(blog)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }
}

fn target_columns(target: &Option<ReportTarget>) -> (Option<Uuid>, Option<&'static str>) {
    match target {
        Some(t) => (Some(t.id()), Some(t.model())),
        None => (None, None),
    }
}

fn push_report_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ReportFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ");
        qb.push_bind(status.as_str());
    }
    if let Some(kind) = filter.report_type {
        match kind {
            ReportType::General => {
                qb.push(" AND reported_item_model IS NULL");
            }
            ReportType::Article => {
                qb.push(" AND reported_item_model = 'Blog'");
            }
            ReportType::Comment => {
                qb.push(" AND reported_item_model = 'Comment'");
            }
            ReportType::User => {
                qb.push(" AND reported_item_model = 'User'");
            }
        }
    }
}

#[async_trait]
impl ReportRepo for PgStore {
    async fn insert(&self, report: Report) -> Result<Report> {
        let (item_id, item_model) = target_columns(&report.target);
        sqlx::query(
            "INSERT INTO reports (id, reason, description, reporter, reported_item_id, \
             reported_item_model, status, admin_notes, reviewed_by, reviewed_at, resolved_at, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(report.id)
        .bind(report.reason.as_str())
        .bind(&report.description)
        .bind(report.reporter)
        .bind(item_id)
        .bind(item_model)
        .bind(report.status.as_str())
        .bind(&report.admin_notes)
        .bind(report.reviewed_by)
        .bind(report.reviewed_at)
        .bind(report.resolved_at)
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(report)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Report>> {
        sqlx::query("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(|row| row_to_report(&row))
            .transpose()
    }

    async fn update(&self, report: Report) -> Result<Report> {
        sqlx::query(
            "UPDATE reports SET status = $2, admin_notes = $3, reviewed_by = $4, \
             reviewed_at = $5, resolved_at = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(report.id)
        .bind(report.status.as_str())
        .bind(&report.admin_notes)
        .bind(report.reviewed_by)
        .bind(report.reviewed_at)
        .bind(report.resolved_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(report)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected() > 0)
    }

    async fn list(&self, filter: ReportFilter, page: PageRequest) -> Result<Page<Report>> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM reports WHERE 1=1");
        push_report_filters(&mut count_qb, &filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut qb = QueryBuilder::new("SELECT * FROM reports WHERE 1=1");
        push_report_filters(&mut qb, &filter);
        qb.push(" ORDER BY created_at DESC");
        push_page(&mut qb, page);
        let rows = qb.build().fetch_all(&self.pool).await.map_err(map_sqlx)?;
        let items = rows.iter().map(row_to_report).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total as u64, page))
    }

    async fn exists_for(&self, reporter: Uuid, target: ReportTarget) -> Result<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reports WHERE reporter = $1 \
             AND reported_item_id = $2 AND reported_item_model = $3)",
        )
        .bind(reporter)
        .bind(target.id())
        .bind(target.model())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn delete_by_reporter(&self, reporter: Uuid) -> Result<u64> {
        let done = sqlx::query("DELETE FROM reports WHERE reporter = $1")
            .bind(reporter)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(done.rows_affected())
    }

    async fn delete_by_target(&self, target: ReportTarget) -> Result<u64> {
        let done = sqlx::query(
            "DELETE FROM reports WHERE reported_item_id = $1 AND reported_item_model = $2",
        )
        .bind(target.id())
        .bind(target.model())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(done.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }

    async fn count_by_status(&self, status: ReportStatus) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }

    async fn stats(&self) -> Result<ReportStats> {
        let bucket_rows = |rows: Vec<PgRow>| {
            rows.into_iter()
                .map(|row| CountBucket {
                    key: row.get("key"),
                    count: row.get::<i64, _>("count") as u64,
                })
                .collect::<Vec<_>>()
        };

        let by_status = sqlx::query(
            "SELECT status AS key, COUNT(*) AS count FROM reports GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let by_type = sqlx::query(
            "SELECT CASE reported_item_model \
                 WHEN 'Blog' THEN 'article' \
                 WHEN 'Comment' THEN 'comment' \
                 WHEN 'User' THEN 'user' \
                 ELSE 'general' END AS key, \
             COUNT(*) AS count FROM reports GROUP BY 1 ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let by_reason = sqlx::query(
            "SELECT reason AS key, COUNT(*) AS count FROM reports GROUP BY reason ORDER BY reason",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(ReportStats {
            by_status: bucket_rows(by_status),
            by_type: bucket_rows(by_type),
            by_reason: bucket_rows(by_reason),
        })
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Report>> {
        let rows = sqlx::query("SELECT * FROM reports ORDER BY created_at DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.iter().map(row_to_report).collect()
    }
}
