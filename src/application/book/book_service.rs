use crate::domain::{Book, BookChanges, BookDraft, BookId, BookQuery, Document};
use crate::ports::BookStore;
use serde_json::Value;
use std::sync::Arc;

use super::errors::{BookApplicationError, Result};

/// サービスの依存関係
///
/// ストアへのハンドルは起動時に一度だけ生成され、ここを通じて注入される。
/// テストではインメモリ実装に差し替える。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_store: Arc<dyn BookStore>,
}

fn parse_book_id(id: &str) -> Result<BookId> {
    id.parse()
        .map_err(|_| BookApplicationError::InvalidBookId(id.to_string()))
}

fn into_document(payload: Value) -> Result<Document> {
    match payload {
        Value::Object(document) => Ok(document),
        other => Err(BookApplicationError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 書籍一覧を取得する
///
/// 一致する書籍がない場合は空のVecを返す（エラーではない）。
pub async fn list_books(deps: &ServiceDependencies, query: BookQuery) -> Result<Vec<Book>> {
    tracing::debug!(?query, "Listing books");

    deps.book_store
        .find(&query)
        .await
        .map_err(BookApplicationError::StoreError)
}

/// 書籍を作成する
///
/// ビジネスルール：
/// - title と author は空でない文字列
/// - year は1800より大きい
/// - rating は0以上5以下
/// - genres は配列
///
/// 検証に通れば、追加フィールドも含めてペイロード全体を保存する。
/// ストアが採番したIDを返す。
pub async fn create_book(deps: &ServiceDependencies, payload: Value) -> Result<BookId> {
    let draft = BookDraft::validate(into_document(payload)?)?;

    let id = deps
        .book_store
        .insert(draft)
        .await
        .map_err(BookApplicationError::StoreError)?;

    tracing::info!(book_id = %id, "Book created");
    Ok(id)
}

/// IDで書籍を取得する
pub async fn get_book(deps: &ServiceDependencies, id: &str) -> Result<Book> {
    let id = parse_book_id(id)?;

    deps.book_store
        .find_by_id(id)
        .await
        .map_err(BookApplicationError::StoreError)?
        .ok_or(BookApplicationError::BookNotFound)
}

/// 書籍を部分更新する
///
/// `_id` は取り除かれ、識別子が書き換えられることはない。
/// 作成時と異なり、フィールドの値は再検証しない。
pub async fn update_book(deps: &ServiceDependencies, id: &str, payload: Value) -> Result<()> {
    let id = parse_book_id(id)?;
    let changes = BookChanges::from_payload(into_document(payload)?);

    if changes.is_empty() {
        return Err(BookApplicationError::InvalidPayload(
            "no fields to update".to_string(),
        ));
    }

    let matched = deps
        .book_store
        .update(id, &changes)
        .await
        .map_err(BookApplicationError::StoreError)?;

    if !matched {
        return Err(BookApplicationError::BookNotFound);
    }

    tracing::info!(book_id = %id, fields = changes.fields().len(), "Book updated");
    Ok(())
}

/// 書籍を削除する
pub async fn delete_book(deps: &ServiceDependencies, id: &str) -> Result<()> {
    let id = parse_book_id(id)?;

    let deleted = deps
        .book_store
        .delete(id)
        .await
        .map_err(BookApplicationError::StoreError)?;

    if !deleted {
        return Err(BookApplicationError::BookNotFound);
    }

    tracing::info!(book_id = %id, "Book deleted");
    Ok(())
}
