use crate::application::book::BookApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// エラーが発生した書籍操作
///
/// 同じ障害でも操作ごとに返すステータスとメッセージが異なるため、
/// API層のエラーは操作とセットで扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOperation {
    List,
    Create,
    Fetch,
    Update,
    Delete,
}

impl BookOperation {
    /// ストア障害・不正なIDなど、入力の形以外が原因の失敗に返すステータス
    fn fault_status(self) -> StatusCode {
        match self {
            BookOperation::Create | BookOperation::Update => StatusCode::BAD_REQUEST,
            BookOperation::List | BookOperation::Fetch | BookOperation::Delete => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 詳細を漏らさない汎用メッセージ
    fn fault_message(self) -> &'static str {
        match self {
            BookOperation::List => "failed to retrieve books",
            BookOperation::Create => "failed to create book",
            BookOperation::Fetch => "failed to retrieve book",
            BookOperation::Update => "failed to update book",
            BookOperation::Delete => "failed to delete book",
        }
    }
}

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError {
    operation: BookOperation,
    error: BookApplicationError,
}

impl ApiError {
    pub fn new(operation: BookOperation, error: BookApplicationError) -> Self {
        Self { operation, error }
    }

    /// `map_err` 用のコンストラクタ
    pub fn during(operation: BookOperation) -> impl Fn(BookApplicationError) -> Self {
        move |error| Self::new(operation, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let operation = self.operation;
        let (status, message) = match self.error {
            // 400 Bad Request - 作成時の検証エラー
            BookApplicationError::Validation(ref e) => (StatusCode::BAD_REQUEST, e.to_string()),

            // 404 Not Found - リクエストは正しいが該当する書籍がない
            BookApplicationError::BookNotFound => {
                (StatusCode::NOT_FOUND, "book not found".to_string())
            }

            // 作成時はペイロードの不正・ストアのエラーとも内容をそのまま返す
            BookApplicationError::InvalidPayload(ref msg)
                if operation == BookOperation::Create =>
            {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            BookApplicationError::StoreError(ref e) if operation == BookOperation::Create => {
                tracing::warn!("Book store rejected insert: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }

            // それ以外は操作ごとの汎用メッセージ
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ref e => {
                let status = operation.fault_status();
                if status.is_server_error() {
                    tracing::error!(?operation, "Book request failed: {}", e);
                } else {
                    tracing::warn!(?operation, "Book request rejected: {}", e);
                }
                (status, operation.fault_message().to_string())
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    async fn render(operation: BookOperation, error: BookApplicationError) -> (StatusCode, String) {
        let response = ApiError::new(operation, error).into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, body.error)
    }

    fn store_error() -> BookApplicationError {
        BookApplicationError::StoreError("connection reset by peer".into())
    }

    #[tokio::test]
    async fn test_validation_error_uses_rule_message() {
        let (status, message) = render(
            BookOperation::Create,
            BookApplicationError::Validation(ValidationError::InvalidYear),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "invalid date");
    }

    #[tokio::test]
    async fn test_store_error_on_create_exposes_cause() {
        let (status, message) = render(BookOperation::Create, store_error()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "connection reset by peer");
    }

    #[tokio::test]
    async fn test_store_error_on_reads_and_delete_is_opaque_server_fault() {
        for (operation, expected) in [
            (BookOperation::List, "failed to retrieve books"),
            (BookOperation::Fetch, "failed to retrieve book"),
            (BookOperation::Delete, "failed to delete book"),
        ] {
            let (status, message) = render(operation, store_error()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, expected);
        }
    }

    #[tokio::test]
    async fn test_update_faults_are_client_faults() {
        let (status, message) = render(
            BookOperation::Update,
            BookApplicationError::InvalidBookId("42".into()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "failed to update book");

        let (status, _) = render(BookOperation::Update, store_error()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_is_distinct_from_faults() {
        let (status, message) =
            render(BookOperation::Delete, BookApplicationError::BookNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "book not found");
    }
}
