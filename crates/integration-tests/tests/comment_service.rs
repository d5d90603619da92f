//! Comment service behavior: threading rules, authorization, likes.

mod fixtures;

use domains::{DomainError, PageRequest, Role};
use fixtures::{actor, TestApp};
use uuid::Uuid;

#[tokio::test]
async fn replies_must_share_the_parents_blog() {
    let app = TestApp::new();
    let author = app.seed_user("host", Role::User).await;
    let commenter = app.seed_user("guest", Role::User).await;
    let blog_a = app.seed_blog(&author, "Thread A", true).await;
    let blog_b = app.seed_blog(&author, "Thread B", true).await;

    let top = app.seed_comment(&commenter, blog_a.id, None).await;

    // Reply on the same blog is fine.
    let reply = app
        .comments
        .create(Some(&actor(&commenter)), blog_a.id, "agreed".to_string(), Some(top.id))
        .await
        .unwrap();
    assert_eq!(reply.parent, Some(top.id));

    // The same parent under a different blog is rejected.
    let err = app
        .comments
        .create(Some(&actor(&commenter)), blog_b.id, "lost".to_string(), Some(top.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));

    // As is a parent that does not exist at all.
    let err = app
        .comments
        .create(Some(&actor(&commenter)), blog_a.id, "ghost".to_string(), Some(Uuid::now_v7()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(..)));
}

#[tokio::test]
async fn listing_groups_replies_under_top_level_comments() {
    let app = TestApp::new();
    let author = app.seed_user("author", Role::User).await;
    let commenter = app.seed_user("talker", Role::User).await;
    let blog = app.seed_blog(&author, "Busy Post", true).await;

    let first = app.seed_comment(&commenter, blog.id, None).await;
    let second = app.seed_comment(&commenter, blog.id, None).await;
    app.seed_comment(&author, blog.id, Some(first.id)).await;
    app.seed_comment(&commenter, blog.id, Some(first.id)).await;

    let page = app.comments.list_for_blog(blog.id, PageRequest::new(1, 10)).await.unwrap();
    // Replies are attached, not counted as top-level items.
    assert_eq!(page.total_count, 2);
    let first_thread = page
        .items
        .iter()
        .find(|thread| thread.comment.id == first.id)
        .expect("first comment present");
    assert_eq!(first_thread.replies.len(), 2);
    let second_thread = page
        .items
        .iter()
        .find(|thread| thread.comment.id == second.id)
        .expect("second comment present");
    assert!(second_thread.replies.is_empty());
}

#[tokio::test]
async fn comment_content_is_validated() {
    let app = TestApp::new();
    let author = app.seed_user("poster", Role::User).await;
    let blog = app.seed_blog(&author, "Rules", true).await;

    let err = app
        .comments
        .create(Some(&actor(&author)), blog.id, "   ".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = app
        .comments
        .create(Some(&actor(&author)), blog.id, "x".repeat(1001), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn only_author_or_admin_may_edit_or_delete() {
    let app = TestApp::new();
    let author = app.seed_user("writer", Role::User).await;
    let commenter = app.seed_user("commenter", Role::User).await;
    let admin = app.seed_user("mod", Role::Admin).await;
    let blog = app.seed_blog(&author, "Moderated", true).await;
    let comment = app.seed_comment(&commenter, blog.id, None).await;

    // The blog's author does not own its comments.
    assert!(matches!(
        app.comments.update(Some(&actor(&author)), comment.id, "edited".to_string()).await,
        Err(DomainError::Forbidden(_))
    ));

    let edited = app
        .comments
        .update(Some(&actor(&commenter)), comment.id, "edited".to_string())
        .await
        .unwrap();
    assert_eq!(edited.content, "edited");

    app.comments.delete(Some(&actor(&admin)), comment.id).await.unwrap();
    assert!(matches!(
        app.comments.update(Some(&actor(&commenter)), comment.id, "late".to_string()).await,
        Err(DomainError::NotFound(..))
    ));
}

#[tokio::test]
async fn comment_likes_toggle_like_blog_likes() {
    let app = TestApp::new();
    let author = app.seed_user("liked", Role::User).await;
    let fan = app.seed_user("fan", Role::User).await;
    let blog = app.seed_blog(&author, "Likeable", true).await;
    let comment = app.seed_comment(&author, blog.id, None).await;

    let on = app.comments.toggle_like(Some(&actor(&fan)), comment.id).await.unwrap();
    assert!(on.is_liked);
    assert_eq!(on.likes_count, 1);
    let off = app.comments.toggle_like(Some(&actor(&fan)), comment.id).await.unwrap();
    assert!(!off.is_liked);
    assert_eq!(off.likes_count, 0);
}
