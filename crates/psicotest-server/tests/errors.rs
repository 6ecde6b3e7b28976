use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use psicotest_core::error::CoreError;
use psicotest_server::error::ApiError;
use psicotest_storage::error::StorageError;

async fn respond(err: StorageError) -> (StatusCode, Value) {
    let response = ApiError::from(err).into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn corrupt_rows_are_internal_errors_without_detail() {
    let (status, body) = respond(StorageError::Decode(
        "options: invalid options for question: duplicate option score 1".to_string(),
    ))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn invalid_test_input_is_a_bad_request() {
    let (status, body) = respond(StorageError::Core(CoreError::MissingField("title".to_string()))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn conflicts_map_to_409() {
    let (status, _) = respond(StorageError::SlugTaken("phq-9".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = respond(StorageError::BuiltInTest("phq-9".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("phq-9"));
}
