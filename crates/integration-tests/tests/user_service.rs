//! Account service behavior: registration, login, profile edits.

mod fixtures;

use domains::{DomainError, Role};
use fixtures::{actor, TestApp};
use services::Registration;

fn registration(name: &str) -> Registration {
    Registration {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password: "a-long-password".to_string(),
    }
}

#[tokio::test]
async fn register_then_login_roundtrip() {
    let app = TestApp::new();
    let session = app.users.register(registration("newcomer")).await.unwrap();
    assert_eq!(session.user.role, Role::User);
    assert_eq!(session.user.username, "newcomer");

    // The issued token resolves back to the account.
    let resolved = app.users.resolve_token(&session.token).await.unwrap();
    assert_eq!(resolved.id, session.user.id);

    let login = app.users.login("newcomer@example.com", "a-long-password").await.unwrap();
    assert_eq!(login.user.id, session.user.id);

    // Wrong password and unknown email fail identically.
    assert!(matches!(
        app.users.login("newcomer@example.com", "wrong").await,
        Err(DomainError::Unauthorized(_))
    ));
    assert!(matches!(
        app.users.login("nobody@example.com", "a-long-password").await,
        Err(DomainError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn registration_enforces_shape_and_uniqueness() {
    let app = TestApp::new();
    app.users.register(registration("taken")).await.unwrap();

    // Same username, different email.
    let mut dup_name = registration("taken");
    dup_name.email = "other@example.com".to_string();
    assert!(matches!(
        app.users.register(dup_name).await,
        Err(DomainError::Conflict(_))
    ));

    // Same email, different username.
    let mut dup_email = registration("different");
    dup_email.email = "taken@example.com".to_string();
    assert!(matches!(
        app.users.register(dup_email).await,
        Err(DomainError::Conflict(_))
    ));

    let mut short_pw = registration("fine");
    short_pw.password = "short".to_string();
    assert!(matches!(
        app.users.register(short_pw).await,
        Err(DomainError::Validation(_))
    ));

    let mut bad_email = registration("fine");
    bad_email.email = "nonsense".to_string();
    assert!(matches!(
        app.users.register(bad_email).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn emails_are_case_insensitive_at_registration_and_login() {
    let app = TestApp::new();
    let mut input = registration("cased");
    input.email = "Cased@Example.COM".to_string();
    app.users.register(input).await.unwrap();

    assert!(app.users.login("cased@example.com", "a-long-password").await.is_ok());
}

#[tokio::test]
async fn profile_updates_validate_bio_length() {
    let app = TestApp::new();
    let user = app.seed_user("biographer", Role::User).await;

    let updated = app
        .users
        .update_profile(Some(&actor(&user)), Some("I write things.".to_string()), None)
        .await
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("I write things."));

    assert!(matches!(
        app.users
            .update_profile(Some(&actor(&user)), Some("x".repeat(501)), None)
            .await,
        Err(DomainError::Validation(_))
    ));

    // A blank bio clears the field.
    let cleared = app
        .users
        .update_profile(Some(&actor(&user)), Some("   ".to_string()), None)
        .await
        .unwrap();
    assert_eq!(cleared.bio, None);
}

#[tokio::test]
async fn deleted_accounts_invalidate_live_tokens() {
    let app = TestApp::new();
    let admin = app.seed_user("mod", Role::Admin).await;
    let session = app.users.register(registration("shortlived")).await.unwrap();

    app.users.delete(Some(&actor(&admin)), session.user.id).await.unwrap();
    assert!(matches!(
        app.users.resolve_token(&session.token).await,
        Err(DomainError::Unauthorized(_))
    ));
}
