use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use psicotest_core::models::test::{Test, TestWithQuestions};
use psicotest_instruments::scoring;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    #[serde(flatten)]
    test: Test,
    question_count: usize,
    max_score: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetail {
    #[serde(flatten)]
    test: TestWithQuestions,
    max_score: u32,
}

pub async fn list_tests(State(state): State<AppState>) -> Result<Json<Vec<TestSummary>>, ApiError> {
    let tests = state.gateway.get_tests().await?;

    let mut summaries = Vec::with_capacity(tests.len());
    for test in tests {
        let questions = state.gateway.get_questions_by_test_id(&test.id).await?;
        summaries.push(TestSummary {
            question_count: questions.len(),
            max_score: scoring::max_score(&questions),
            test,
        });
    }

    Ok(Json(summaries))
}

pub async fn get_test(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TestDetail>, ApiError> {
    let test = state
        .gateway
        .get_test_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("test not found: {slug}")))?;
    let questions = state.gateway.get_questions_by_test_id(&test.id).await?;

    Ok(Json(TestDetail {
        max_score: scoring::max_score(&questions),
        test: TestWithQuestions { test, questions },
    }))
}
