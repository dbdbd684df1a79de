/*
 * Responsibility
 * - POST /login: email/password → access token + identifier
 * - GET /me: 認証済み principal の identifier を返す
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::auth::{LoginRequest, LoginResponse, WhoAmIResponse},
        extractors::{AuthCtxExtractor, JsonBody},
    },
    error::AppError,
    services::auth::password::verify_password,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim();

    // Unknown user and wrong password are indistinguishable to the caller.
    let Some(user) = state.users.find_by_email(email).await? else {
        tracing::warn!("login failed: unknown email");
        return Err(AppError::Unauthorized);
    };

    let matches = verify_password(&req.password, &user.password_hash).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "stored password hash unusable");
        AppError::Internal
    })?;
    if !matches {
        tracing::warn!(user_id = %user.id, "login failed: wrong password");
        return Err(AppError::Unauthorized);
    }

    let issued = state.auth.issue(user.id, &user.email).map_err(|e| {
        tracing::error!(error = %e, "failed to sign access token");
        AppError::Internal
    })?;
    tracing::info!(user_id = %user.id, "login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        username: user.email,
        expires_in: issued.expires_in,
    }))
}

pub async fn who_am_i(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        username: ctx.email,
    })
}
