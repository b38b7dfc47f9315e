use super::*;
use uuid::Uuid;

async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn status_mapping() {
    assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::SessionNotFound.status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::from(SessionError::InvalidId("x".into())).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::from(SessionError::NotFound(Uuid::nil())).status(), StatusCode::NOT_FOUND);
    assert_eq!(
        ApiError::from(SessionError::Database(sqlx::Error::PoolTimedOut)).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn codes_delegate_to_session_error() {
    assert_eq!(ApiError::BadRequest("x".into()).error_code(), "E_BAD_REQUEST");
    assert_eq!(ApiError::SessionNotFound.error_code(), "E_SESSION_NOT_FOUND");
    assert_eq!(ApiError::from(SessionError::InvalidId("x".into())).error_code(), "E_INVALID_SESSION_ID");
    assert_eq!(ApiError::from(SessionError::Database(sqlx::Error::RowNotFound)).error_code(), "E_DATABASE");
}

#[test]
fn retryable_only_for_transient_storage_errors() {
    assert!(ApiError::from(SessionError::Database(sqlx::Error::PoolTimedOut)).retryable());
    assert!(!ApiError::SessionNotFound.retryable());
    assert!(!ApiError::BadRequest("x".into()).retryable());
}

#[tokio::test]
async fn response_body_carries_error_code_and_flag() {
    let (status, body) = body_json(ApiError::SessionNotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session not found");
    assert_eq!(body["code"], "E_SESSION_NOT_FOUND");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn server_errors_render_retryable_flag() {
    let (status, body) = body_json(SessionError::Database(sqlx::Error::PoolTimedOut).into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "E_DATABASE");
    assert_eq!(body["retryable"], true);
}
