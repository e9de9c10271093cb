//! Account handlers: register, login, me, logout.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use inspect_core::validation::{validate_email, validate_password, validate_username};
use inspect_core::{CoreError, UserProfile};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::store::NewUserRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = payload?;

    let email = req.email.trim().to_string();
    let username = req.username.trim().to_string();
    validate_email(&email)?;
    validate_username(&username)?;
    validate_password(&req.password)?;

    if state
        .users
        .find_by_email_or_username(&email, &username)
        .await?
        .is_some()
    {
        debug!(%email, %username, "Registration rejected: account exists");
        return Err(CoreError::AccountExists.into());
    }

    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = state
        .users
        .create(NewUserRecord {
            email,
            username,
            password: req.password,
            name,
        })
        .await?;

    let token = state.jwt.generate_token(&user.id, &user.email)?;
    info!(user_id = %user.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Account created",
            user: user.profile(),
            token,
        }),
    ))
}

/// `POST /api/auth/login`
///
/// Unknown email and wrong password get the same answer.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;

    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let Some(user) = state.users.find_by_email(email).await? else {
        debug!("Login rejected: unknown email");
        return Err(CoreError::InvalidCredentials.into());
    };

    if !state.users.verify_password(&user, &req.password).await {
        debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    let token = state.jwt.generate_token(&user.id, &user.email)?;
    info!(user_id = %user.id, "Logged in");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful",
        user: user.profile(),
        token,
    }))
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .users
        .find_by_id(&auth.id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(auth.id.clone()))?;

    Ok(Json(MeResponse {
        success: true,
        user: user.profile(),
    }))
}

/// `POST /api/auth/logout`
///
/// Tokens are stateless; the client drops its copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Logged out",
    })
}
