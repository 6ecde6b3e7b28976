use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use psicotest_core::models::user::UserProfile;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    token: String,
    user: UserProfile,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if body.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let user = state
        .gateway
        .create_user(email, &body.password, &body.name)
        .await?;
    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    AuditEvent::new("register", "user", user.id.to_string(), user.id.to_string()).emit();

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".to_string()));
    }

    let Some(user) = state
        .gateway
        .authenticate_user(&body.email, &body.password)
        .await?
    else {
        AuditEvent::new("login_failed", "user", body.email.trim().to_lowercase(), "anonymous").emit();
        return Err(ApiError::Unauthorized("invalid email or password".to_string()));
    };
    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    AuditEvent::new("login", "user", user.id.to_string(), user.id.to_string()).emit();

    Ok(Json(AuthResponse { token, user }))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .gateway
        .get_user_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {}", user.id)))?;
    Ok(Json(profile))
}
