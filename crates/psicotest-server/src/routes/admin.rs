use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use psicotest_core::models::result::TestResult;
use psicotest_core::models::stats::Stats;
use psicotest_core::models::test::{NewTest, Test, TestWithQuestions};
use psicotest_core::models::user::{Role, UserProfile};

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

pub const DEFAULT_RESULT_LIMIT: u32 = 100;
pub const MAX_RESULT_LIMIT: u32 = 500;

#[derive(Deserialize)]
pub struct RoleUpdate {
    role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUpdate {
    is_active: bool,
}

#[derive(Deserialize)]
pub struct ResultsQuery {
    limit: Option<u32>,
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    Ok(Json(state.gateway.list_users().await?))
}

pub async fn set_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    if id == admin.id && body.role != Role::Admin {
        return Err(ApiError::BadRequest("administrators cannot demote themselves".to_string()));
    }

    let user = state
        .gateway
        .set_user_role(id, body.role)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {id}")))?;

    AuditEvent::new("set_user_role", "user", id.to_string(), admin.id.to_string())
        .with_details(serde_json::json!({ "role": body.role }))
        .emit();

    Ok(Json(user))
}

pub async fn set_user_active(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ActiveUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    if id == admin.id && !body.is_active {
        return Err(ApiError::BadRequest("administrators cannot deactivate themselves".to_string()));
    }

    let user = state
        .gateway
        .set_user_active(id, body.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {id}")))?;

    AuditEvent::new("set_user_active", "user", id.to_string(), admin.id.to_string())
        .with_details(serde_json::json!({ "is_active": body.is_active }))
        .emit();

    Ok(Json(user))
}

/// Every test, including inactive and superseded versions.
pub async fn list_tests(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Test>>, ApiError> {
    Ok(Json(state.gateway.list_all_tests().await?))
}

pub async fn create_test(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<NewTest>,
) -> Result<(StatusCode, Json<TestWithQuestions>), ApiError> {
    let test = state.gateway.create_test(body).await?;

    AuditEvent::new("create_test", "test", test.test.id.clone(), admin.id.to_string())
        .with_details(serde_json::json!({ "slug": test.test.slug }))
        .emit();

    Ok((StatusCode::CREATED, Json(test)))
}

pub async fn update_test(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<NewTest>,
) -> Result<Json<TestWithQuestions>, ApiError> {
    let test = state
        .gateway
        .update_test(&id, body)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("test not found: {id}")))?;

    AuditEvent::new("update_test", "test", id.clone(), admin.id.to_string())
        .with_details(serde_json::json!({
            "test_id": test.test.id,
            "version": test.test.version,
        }))
        .emit();

    Ok(Json(test))
}

pub async fn set_test_active(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<ActiveUpdate>,
) -> Result<Json<Test>, ApiError> {
    let test = state
        .gateway
        .set_test_active(&id, body.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("test not found: {id}")))?;

    AuditEvent::new("set_test_active", "test", id, admin.id.to_string())
        .with_details(serde_json::json!({ "is_active": body.is_active }))
        .emit();

    Ok(Json(test))
}

/// All results, newest first.
pub async fn list_results(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Vec<TestResult>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RESULT_LIMIT)
        .clamp(1, MAX_RESULT_LIMIT);
    Ok(Json(state.gateway.list_all_results(limit).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Stats>, ApiError> {
    Ok(Json(state.gateway.stats().await?))
}
