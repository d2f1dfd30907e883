use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{
    Book, BookFilter, BookQuery, SortSpec, parse_available, parse_min_rating, parse_text,
};

/// 書籍一覧取得のクエリパラメータ
///
/// 値はすべて文字列のまま受け取り、解釈はドメイン層の規則に従う。
/// 同じパラメータが複数回指定された場合は最初の値を使う。
#[derive(Debug, Default)]
pub struct ListBooksQuery {
    /// 著者でフィルタリング（完全一致）
    pub author: Option<String>,
    /// 貸出可能フラグでフィルタリング（"true" / "false" のみ有効）
    pub available: Option<String>,
    /// ジャンルでフィルタリング
    pub genre: Option<String>,
    /// 評価の下限
    pub min_rating: Option<String>,
    /// 並び替えフィールド（rating / year）
    pub sort_field: Option<String>,
    /// 並び替え方向（desc で降順）
    pub sort_direction: Option<String>,
}

impl ListBooksQuery {
    /// デコード済みの `(名前, 値)` の並びから組み立てる（未知のパラメータは無視）
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "author" => &mut query.author,
                "available" => &mut query.available,
                "genre" => &mut query.genre,
                "minRating" => &mut query.min_rating,
                "sortField" => &mut query.sort_field,
                "sortDirection" => &mut query.sort_direction,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn to_query(&self) -> BookQuery {
        BookQuery {
            filter: BookFilter {
                author: parse_text(self.author.as_deref()),
                available: parse_available(self.available.as_deref()),
                genre: parse_text(self.genre.as_deref()),
                min_rating: parse_min_rating(self.min_rating.as_deref()),
            },
            sort: SortSpec::parse(self.sort_field.as_deref(), self.sort_direction.as_deref()),
        }
    }
}

/// 書籍レスポンス（GET /books/:id と GET /books）
///
/// 保存されているドキュメントをそのまま返し、識別子を `_id` として付与する。
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.value(),
            fields: book.fields,
        }
    }
}

/// 作成レスポンス（POST /books）
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResultResponse {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

/// 更新・削除の確認メッセージ
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
