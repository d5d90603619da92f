//! Blog service behavior: slug uniqueness, read-time maintenance, views,
//! likes, draft visibility, and pagination.

mod fixtures;

use domains::{DomainError, PageRequest, Role};
use fixtures::{actor, TestApp};
use services::{BlogUpdate, NewBlog};

fn new_blog(title: &str, published: bool) -> NewBlog {
    NewBlog {
        title: title.to_string(),
        content: "A modest amount of content.".to_string(),
        excerpt: "Excerpt.".to_string(),
        cover_image: None,
        tags: vec!["rust".to_string()],
        published,
    }
}

#[tokio::test]
async fn identical_titles_get_numeric_slug_suffixes() {
    let app = TestApp::new();
    let author = app.seed_user("slugger", Role::User).await;
    let a = actor(&author);

    let first = app.blogs.create(Some(&a), new_blog("My First Post", true)).await.unwrap();
    let second = app.blogs.create(Some(&a), new_blog("My First Post", true)).await.unwrap();
    let third = app.blogs.create(Some(&a), new_blog("My First Post", true)).await.unwrap();

    assert_eq!(first.slug, "my-first-post");
    assert_eq!(second.slug, "my-first-post-1");
    assert_eq!(third.slug, "my-first-post-2");
}

#[tokio::test]
async fn read_time_tracks_content_changes() {
    let app = TestApp::new();
    let author = app.seed_user("writer", Role::User).await;
    let a = actor(&author);

    let mut input = new_blog("Long Read", true);
    input.content = vec!["word"; 450].join(" ");
    let blog = app.blogs.create(Some(&a), input).await.unwrap();
    assert_eq!(blog.read_time, 3);

    let updated = app
        .blogs
        .update(
            Some(&a),
            blog.id,
            BlogUpdate { content: Some("short now".to_string()), ..BlogUpdate::default() },
        )
        .await
        .unwrap();
    assert_eq!(updated.read_time, 1);
    // Slug never changes after creation, even when the title does.
    let renamed = app
        .blogs
        .update(
            Some(&a),
            blog.id,
            BlogUpdate { title: Some("Completely New Title".to_string()), ..BlogUpdate::default() },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, "long-read");
}

#[tokio::test]
async fn public_reads_bump_views_draft_and_edit_reads_do_not() {
    let app = TestApp::new();
    let author = app.seed_user("viewed", Role::User).await;
    let a = actor(&author);
    let blog = app.blogs.create(Some(&a), new_blog("Counted", true)).await.unwrap();

    let read1 = app.blogs.get_by_slug(None, "counted").await.unwrap();
    assert_eq!(read1.views, 1);
    let read2 = app.blogs.get_by_slug(Some(&a), "counted").await.unwrap();
    assert_eq!(read2.views, 2);

    // The edit path never counts.
    app.blogs.get_for_edit(Some(&a), blog.id).await.unwrap();
    assert_eq!(app.blogs.get_by_slug(None, "counted").await.unwrap().views, 3);

    // Draft reads by the author do not count either.
    app.blogs.create(Some(&a), new_blog("Hidden Draft", false)).await.unwrap();
    let draft = app.blogs.get_by_slug(Some(&a), "hidden-draft").await.unwrap();
    assert_eq!(draft.views, 0);
}

#[tokio::test]
async fn drafts_are_invisible_to_everyone_but_author_and_admin() {
    let app = TestApp::new();
    let author = app.seed_user("drafter", Role::User).await;
    let stranger = app.seed_user("stranger", Role::User).await;
    let admin = app.seed_user("moderator", Role::Admin).await;
    app.blogs.create(Some(&actor(&author)), new_blog("Secret Draft", false)).await.unwrap();

    assert!(matches!(
        app.blogs.get_by_slug(None, "secret-draft").await,
        Err(DomainError::NotFound(..))
    ));
    assert!(matches!(
        app.blogs.get_by_slug(Some(&actor(&stranger)), "secret-draft").await,
        Err(DomainError::NotFound(..))
    ));
    assert!(app.blogs.get_by_slug(Some(&actor(&author)), "secret-draft").await.is_ok());
    assert!(app.blogs.get_by_slug(Some(&actor(&admin)), "secret-draft").await.is_ok());

    // Public listing never carries drafts.
    let listing = app.blogs.list_published(None, None, PageRequest::new(1, 50)).await.unwrap();
    assert!(listing.items.iter().all(|b| b.published));
}

#[tokio::test]
async fn like_toggle_twice_returns_to_baseline() {
    let app = TestApp::new();
    let author = app.seed_user("liked", Role::User).await;
    let fan = app.seed_user("fan", Role::User).await;
    let blog = app.blogs.create(Some(&actor(&author)), new_blog("Likeable", true)).await.unwrap();

    let on = app.blogs.toggle_like(Some(&actor(&fan)), blog.id).await.unwrap();
    assert!(on.is_liked);
    assert_eq!(on.likes_count, 1);

    let off = app.blogs.toggle_like(Some(&actor(&fan)), blog.id).await.unwrap();
    assert!(!off.is_liked);
    assert_eq!(off.likes_count, 0);

    assert!(matches!(
        app.blogs.toggle_like(None, blog.id).await,
        Err(DomainError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn only_author_or_admin_may_mutate() {
    let app = TestApp::new();
    let author = app.seed_user("owner", Role::User).await;
    let stranger = app.seed_user("intruder", Role::User).await;
    let admin = app.seed_user("root", Role::Admin).await;
    let blog = app.blogs.create(Some(&actor(&author)), new_blog("Guarded", true)).await.unwrap();

    let update = BlogUpdate { title: Some("Taken Over".to_string()), ..BlogUpdate::default() };
    assert!(matches!(
        app.blogs.update(Some(&actor(&stranger)), blog.id, update.clone()).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        app.blogs.update(None, blog.id, update.clone()).await,
        Err(DomainError::Unauthorized(_))
    ));
    assert!(app.blogs.update(Some(&actor(&admin)), blog.id, update).await.is_ok());

    assert!(matches!(
        app.blogs.delete(Some(&actor(&stranger)), blog.id).await,
        Err(DomainError::Forbidden(_))
    ));
    app.blogs.delete(Some(&actor(&author)), blog.id).await.unwrap();
    assert!(matches!(
        app.blogs.get_for_edit(Some(&actor(&author)), blog.id).await,
        Err(DomainError::NotFound(..))
    ));
}

#[tokio::test]
async fn twenty_five_blogs_paginate_into_three_pages() {
    let app = TestApp::new();
    let author = app.seed_user("prolific", Role::User).await;
    let a = actor(&author);
    for i in 0..25 {
        app.blogs.create(Some(&a), new_blog(&format!("Post {i}"), true)).await.unwrap();
    }

    let page3 = app.blogs.list_published(None, None, PageRequest::new(3, 10)).await.unwrap();
    assert_eq!(page3.items.len(), 5);
    assert_eq!(page3.current_page, 3);
    assert_eq!(page3.total_pages, 3);
    assert_eq!(page3.total_count, 25);
}

#[tokio::test]
async fn search_matches_title_content_and_tags() {
    let app = TestApp::new();
    let author = app.seed_user("searchable", Role::User).await;
    let a = actor(&author);

    let mut tagged = new_blog("About Databases", true);
    tagged.tags = vec!["postgres".to_string()];
    app.blogs.create(Some(&a), tagged).await.unwrap();
    let mut in_body = new_blog("Unrelated Title", true);
    in_body.content = "A deep dive into PostgreSQL internals.".to_string();
    app.blogs.create(Some(&a), in_body).await.unwrap();
    app.blogs.create(Some(&a), new_blog("Cooking Notes", true)).await.unwrap();

    let hits = app
        .blogs
        .list_published(Some("postgres".to_string()), None, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(hits.total_count, 2);

    let tag_hits = app
        .blogs
        .list_published(None, Some("postgres".to_string()), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(tag_hits.total_count, 1);
}
