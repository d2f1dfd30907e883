use crate::domain::ValidationError;
use thiserror::Error;

/// 書籍管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookApplicationError {
    /// 作成ペイロードの検証エラー
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// IDがストアの識別子として解釈できない
    #[error("Invalid book id: {0}")]
    InvalidBookId(String),

    /// ペイロードがJSONオブジェクトでない、または更新内容が空
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// 書籍が見つからない
    #[error("Book not found")]
    BookNotFound,

    /// BookStoreのエラー
    #[error("Book store error: {0}")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookApplicationError>;
