//! Registration, login, and profile endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine as _;
use domains::{Avatar, DomainError};
use services::Registration;
use uuid::Uuid;

use crate::dto::{
    AuthResponse, AvatarUpload, LoginRequest, ProfileResponse, RegisterRequest,
    UpdateProfileRequest, UserResponse,
};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let session = state
        .users
        .register(Registration {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token: session.token,
            user: session.user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state.users.login(&body.email, &body.password).await?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token: session.token,
        user: session.user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.me(Some(&actor)).await?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let avatar = body.avatar.map(decode_avatar).transpose()?;
    let user = state.users.update_profile(Some(&actor), body.bio, avatar).await?;
    Ok(Json(user.into()))
}

pub async fn user_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.users.profile(id).await?;
    Ok(Json(user.into()))
}

fn decode_avatar(upload: AvatarUpload) -> Result<Avatar, ApiError> {
    let content_type: mime::Mime = upload
        .content_type
        .parse()
        .map_err(|_| DomainError::Validation("invalid avatar content type".into()))?;
    if content_type.type_() != mime::IMAGE {
        return Err(DomainError::Validation("avatar must be an image".into()).into());
    }
    let data = base64::engine::general_purpose::STANDARD
        .decode(upload.data)
        .map_err(|_| DomainError::Validation("avatar data must be base64".into()))?;
    Ok(Avatar { data, content_type: content_type.essence_str().to_string() })
}
