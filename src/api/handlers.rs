use crate::application::book::{
    BookApplicationError, ServiceDependencies, create_book as execute_create_book,
    delete_book as execute_delete_book, get_book as execute_get_book,
    list_books as execute_list_books, update_book as execute_update_book,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

use super::{
    error::{ApiError, BookOperation},
    types::{BookResponse, InsertResultResponse, ListBooksQuery, MessageResponse},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// JSONボディの取り出しに失敗した場合はペイロード不正として扱う
fn json_body(
    operation: BookOperation,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Value, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        ApiError::new(
            operation,
            BookApplicationError::InvalidPayload(rejection.body_text()),
        )
    })
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - オプションフィルタ付き書籍一覧取得
///
/// クエリパラメータ:
/// - author: 著者でフィルタリング（完全一致）
/// - available: "true" / "false" でフィルタリング（それ以外の値は無視）
/// - genre: ジャンルでフィルタリング
/// - minRating: 評価の下限（この値を含む）
/// - sortField: rating または year で並び替え
/// - sortDirection: desc で降順、それ以外は昇順
///
/// 同じパラメータが繰り返された場合は最初の値を使う。
/// 一致する書籍がない場合は空配列を返す。
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::new(
            BookOperation::List,
            BookApplicationError::InvalidPayload(rejection.body_text()),
        )
    })?;
    let query = ListBooksQuery::from_pairs(params).to_query();

    let books = execute_list_books(&state.service_deps, query)
        .await
        .map_err(ApiError::during(BookOperation::List))?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /books/:id - 書籍をIDで取得
///
/// 見つかった場合は書籍を返し、見つからない場合は404を返す。
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = execute_get_book(&state.service_deps, &book_id)
        .await
        .map_err(ApiError::during(BookOperation::Fetch))?;

    Ok(Json(BookResponse::from(book)))
}

// ============================================================================
// Command handlers (POST / PUT / DELETE)
// ============================================================================

/// POST /books - 新しい書籍を作成
///
/// 強制されるビジネスルール:
/// - title と author が必須
/// - year は1800より大きいこと
/// - rating は0〜5の範囲であること
/// - genres は配列であること
///
/// 検証を通ったペイロードは追加フィールドも含めてそのまま保存される。
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertResultResponse>), ApiError> {
    let payload = json_body(BookOperation::Create, payload)?;

    let book_id = execute_create_book(&state.service_deps, payload)
        .await
        .map_err(ApiError::during(BookOperation::Create))?;

    let response = InsertResultResponse {
        acknowledged: true,
        inserted_id: book_id.value(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /books/:id - 書籍を部分更新
///
/// 指定されたフィールドのみを上書きし、`_id` は無視する。
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload = json_body(BookOperation::Update, payload)?;

    execute_update_book(&state.service_deps, &book_id, payload)
        .await
        .map_err(ApiError::during(BookOperation::Update))?;

    Ok(Json(MessageResponse::new("book updated successfully")))
}

/// DELETE /books/:id - 書籍を削除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    execute_delete_book(&state.service_deps, &book_id)
        .await
        .map_err(ApiError::during(BookOperation::Delete))?;

    Ok(Json(MessageResponse::new("book deleted successfully")))
}
