use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use psicotest_core::models::answer::Answer;
use psicotest_core::models::result::{NewTestResult, TestResult};
use psicotest_core::models::severity::Severity;
use psicotest_instruments::get_instrument;
use psicotest_instruments::interpret::{InterpretRequest, InterpretationSource};
use psicotest_instruments::scoring;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    test_id: String,
    #[serde(default)]
    answers: Vec<Answer>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Set only when the result was saved to the caller's account.
    id: Option<Uuid>,
    test_id: String,
    total_score: u32,
    max_score: u32,
    percentage: u32,
    category: String,
    severity: Severity,
    interpretation: String,
    recommendations: Vec<String>,
    source: InterpretationSource,
}

/// Score an attempt and interpret it. Saved when the caller is signed in.
pub async fn submit_result(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    if body.test_id.trim().is_empty() {
        return Err(ApiError::BadRequest("testId is required".to_string()));
    }
    if body.answers.is_empty() {
        return Err(ApiError::BadRequest("answers are required".to_string()));
    }

    let test = state
        .gateway
        .get_test_by_id(&body.test_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("test not found: {}", body.test_id)))?;
    if !test.is_active {
        return Err(ApiError::BadRequest(format!("test is not active: {}", test.id)));
    }

    let questions = state.gateway.get_questions_by_test_id(&test.id).await?;
    let evaluation = scoring::evaluate(&questions, &body.answers);

    // The slug is shared by every version of a built-in test.
    let instrument = get_instrument(&test.slug);
    let bands = match &instrument {
        Some(i) if scoring::validate_bands(i.bands(), evaluation.max_score).is_ok() => {
            i.bands().to_vec()
        }
        Some(i) => {
            warn!(
                test_id = %test.id,
                instrument = i.name(),
                max_score = evaluation.max_score,
                "stored questions no longer fit the instrument bands"
            );
            Vec::new()
        }
        None => Vec::new(),
    };
    let request = InterpretRequest {
        test_title: test.title.clone(),
        category: test.category,
        score: evaluation.total_score,
        max_score: evaluation.max_score,
        bands,
    };
    let interpretation = state.interpreter.interpret(&request).await?;

    let mut recommendations = instrument
        .as_ref()
        .map(|i| i.safety_notes(&questions, &body.answers))
        .unwrap_or_default();
    recommendations.extend(interpretation.recommendations);

    let id = match &user {
        Some(user) => {
            let saved = state
                .gateway
                .save_test_result(NewTestResult {
                    user_id: Some(user.id),
                    test_id: test.id.clone(),
                    total_score: evaluation.total_score,
                    max_score: evaluation.max_score,
                    percentage: evaluation.percentage,
                    category: interpretation.label.clone(),
                    severity: interpretation.severity,
                    interpretation: interpretation.text.clone(),
                    recommendations: recommendations.clone(),
                    answers: body.answers,
                })
                .await?;
            AuditEvent::new("submit_result", "test_result", saved.id.to_string(), user.id.to_string())
                .with_details(serde_json::json!({ "test_id": test.id }))
                .emit();
            Some(saved.id)
        }
        None => None,
    };

    Ok(Json(SubmitResponse {
        id,
        test_id: test.id,
        total_score: evaluation.total_score,
        max_score: evaluation.max_score,
        percentage: evaluation.percentage,
        category: interpretation.label,
        severity: interpretation.severity,
        interpretation: interpretation.text,
        recommendations,
        source: interpretation.source,
    }))
}

/// The caller's results, newest first.
pub async fn list_results(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<TestResult>>, ApiError> {
    Ok(Json(state.gateway.get_user_test_results(user.id).await?))
}

/// One result. Other users' results are reported as missing unless the
/// caller is an administrator.
pub async fn get_result(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TestResult>, ApiError> {
    let result = state
        .gateway
        .get_test_result(id)
        .await?
        .filter(|r| user.is_admin() || r.user_id == Some(user.id))
        .ok_or_else(|| ApiError::NotFound(format!("result not found: {id}")))?;
    Ok(Json(result))
}
