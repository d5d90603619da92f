//! Request handlers, grouped the way the route tree is.

pub mod admin;
pub mod auth;
pub mod blogs;
pub mod comments;
pub mod reports;

use uuid::Uuid;

use crate::dto::AuthorRef;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves an author id to the handle responses embed. A missing author
/// (possible for orphaned comments after a shallow cascade) is `None`, not
/// an error.
pub(crate) async fn author_ref(state: &AppState, id: Uuid) -> Result<Option<AuthorRef>, ApiError> {
    Ok(state
        .user_repo
        .find(id)
        .await?
        .map(|user| AuthorRef { id: user.id, username: user.username }))
}
