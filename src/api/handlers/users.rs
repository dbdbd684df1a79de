/*
 * Responsibility
 * - POST /users (登録)
 * - DTO validation → password hash → repo
 * - admin の email は登録させない (admin は seed でのみ作る)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::users::{CreateUserRequest, UserResponse},
        extractors::JsonBody,
    },
    error::AppError,
    repos::{error::RepoError, user_repo::NewUser},
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_USER", msg))?;

    let email = req.email.trim();
    if email == state.access.admin_identifier() {
        tracing::warn!("registration with the admin identifier refused");
        return Err(AppError::conflict("EMAIL_TAKEN", "email is already registered"));
    }

    let password_hash = state.passwords.hash(&req.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        AppError::Internal
    })?;

    let new_user = NewUser {
        email: email.to_string(),
        username: req.username.trim().to_string(),
        firstname: req.firstname.trim().to_string(),
        password_hash,
    };

    let row = state.users.create(&new_user).await.map_err(|e| match e {
        RepoError::Conflict => AppError::conflict("EMAIL_TAKEN", "email is already registered"),
        other => other.into(),
    })?;
    tracing::info!(user_id = %row.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(row))))
}
