//! Identity extraction from `Authorization: Bearer` headers.
//!
//! The token names a user id; the live account is loaded on every request
//! so role changes and deletions take effect immediately, not at token
//! expiry.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{Actor, DomainError};

use crate::error::ApiError;
use crate::state::AppState;

/// An optional identity: `None` for anonymous requests, an error only for
/// a *malformed or stale* credential.
pub struct MaybeUser(pub Option<Actor>);

/// A required identity; missing credentials reject with `Unauthorized`.
pub struct CurrentUser(pub Actor);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeUser(None));
        };
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ApiError(DomainError::Unauthorized("malformed authorization header".into()))
            })?;

        let user = state.users.resolve_token(token).await?;
        Ok(MaybeUser(Some(Actor::from(&user))))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(actor) = MaybeUser::from_request_parts(parts, state).await?;
        actor
            .map(CurrentUser)
            .ok_or_else(|| ApiError(DomainError::Unauthorized("authentication required".into())))
    }
}
