//! Accounts: registration, login, profiles, and admin user management.
//!
//! Password hashing and session tokens are external collaborators behind
//! the `PasswordHasher` / `AuthTokens` ports; this service only sequences
//! them.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Actor, AuthTokens, Avatar, DomainError, Page, PageRequest, PasswordHasher, Result, Role,
    User, UserFilter, UserRepo,
};
use uuid::Uuid;

use crate::cascade::CascadeEngine;
use crate::guard;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 30;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_BIO_LEN: usize = 500;

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A signed-in session: the issued bearer token plus the account it names.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn AuthTokens>,
    cascade: CascadeEngine,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn AuthTokens>,
        cascade: CascadeEngine,
    ) -> Self {
        UserService { users, hasher, tokens, cascade }
    }

    pub async fn register(&self, input: Registration) -> Result<AuthSession> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_lowercase();
        validate_registration(&username, &email, &input.password)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("username is already taken".into()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("email is already registered".into()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash: self.hasher.hash(&input.password)?,
            role: Role::User,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        let user = self.users.insert(user).await?;
        tracing::info!(user = %user.id, "account registered");

        let token = self.tokens.issue(user.id)?;
        Ok(AuthSession { token, user })
    }

    /// Verifies credentials against the stored hash. The same error is
    /// returned for an unknown email and a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("invalid credentials".into()))?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(DomainError::Unauthorized("invalid credentials".into()));
        }

        let token = self.tokens.issue(user.id)?;
        Ok(AuthSession { token, user })
    }

    /// Resolves a bearer token to the live account; deleted accounts fail
    /// with `Unauthorized` even when the token itself is still valid.
    pub async fn resolve_token(&self, token: &str) -> Result<User> {
        let user_id = self.tokens.verify(token)?;
        self.users
            .find(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("account no longer exists".into()))
    }

    pub async fn me(&self, actor: Option<&Actor>) -> Result<User> {
        let actor = guard::require_actor(actor)?;
        self.users
            .find(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", actor.id))
    }

    /// Public profile lookup by id.
    pub async fn profile(&self, id: Uuid) -> Result<User> {
        self.users.find(id).await?.ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn update_profile(
        &self,
        actor: Option<&Actor>,
        bio: Option<String>,
        avatar: Option<Avatar>,
    ) -> Result<User> {
        let actor = guard::require_actor(actor)?;
        let mut user = self
            .users
            .find(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", actor.id))?;

        if let Some(bio) = bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(DomainError::Validation(format!(
                    "bio must be at most {MAX_BIO_LEN} characters"
                )));
            }
            user.bio = Some(bio).filter(|b| !b.trim().is_empty());
        }
        if let Some(avatar) = avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = Utc::now();
        self.users.update(user).await
    }

    pub async fn list_admin(
        &self,
        actor: Option<&Actor>,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<User>> {
        guard::require_admin(actor)?;
        self.users.list(UserFilter { search }, page).await
    }

    /// Role change by an admin; changing one's own role is rejected.
    pub async fn change_role(&self, actor: Option<&Actor>, id: Uuid, role: Role) -> Result<User> {
        let admin = guard::require_admin(actor)?;
        guard::forbid_self_administration(admin, id, "change the role of")?;

        let mut user = self.users.find(id).await?.ok_or_else(|| DomainError::not_found("User", id))?;
        user.role = role;
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;
        tracing::info!(user = %user.id, role = user.role.as_str(), "role updated");
        Ok(user)
    }

    /// Account deletion by an admin; self-deletion is rejected, and owned
    /// content goes with the account via the cascade engine.
    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> Result<()> {
        let admin = guard::require_admin(actor)?;
        guard::forbid_self_administration(admin, id, "delete")?;
        self.cascade.delete_user(id).await
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(DomainError::Validation(format!(
            "username must be {MIN_USERNAME_LEN} to {MAX_USERNAME_LEN} characters"
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(DomainError::Validation(
            "username may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    // Shape check only; deliverability is not the domain's problem.
    let valid_email = email.split_once('@').is_some_and(|(local, host)| {
        !local.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
    });
    if !valid_email {
        return Err(DomainError::Validation("a valid email address is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_validation_rejects_bad_shapes() {
        assert!(validate_registration("ab", "a@b.io", "longenough").is_err());
        assert!(validate_registration("spaced name", "a@b.io", "longenough").is_err());
        assert!(validate_registration("fine", "not-an-email", "longenough").is_err());
        assert!(validate_registration("fine", "a@b.io", "short").is_err());
        assert!(validate_registration("fine", "a@b.io", "longenough").is_ok());
    }
}
