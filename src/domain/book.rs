use serde_json::{Map, Number, Value};

use super::{BookId, ValidationError};

/// スキーマを持たないドキュメント本体（識別子を除くトップレベルのフィールド）
pub type Document = Map<String, Value>;

/// 識別子フィールド名。ペイロードに含まれていても常に取り除かれる。
pub const ID_FIELD: &str = "_id";

/// 出版年の下限（この年を含まない）
pub const MIN_PUBLICATION_YEAR: f64 = 1800.0;

/// 評価の範囲（両端を含む）
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// 保存済みの書籍
///
/// 作成時に検証されたフィールドに加え、任意の追加フィールドや
/// 更新で書き換えられた値をそのまま保持する。
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub fields: Document,
}

impl Book {
    pub fn new(id: BookId, fields: Document) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// 作成リクエストの検証済みペイロード
///
/// 必須フィールドを型付きで保持し、それ以外のフィールドは
/// `extra` にそのまま残して保存時に書き戻す。
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: Option<Number>,
    pub rating: Option<Number>,
    pub genres: Vec<String>,
    pub extra: Document,
}

impl BookDraft {
    /// ペイロードを検証して下書きを作る
    ///
    /// 検証順序:
    /// 1. title と author が空でない文字列
    /// 2. year（指定時）が1800より大きい整数値（`2000.0` のような表記も可）
    /// 3. rating（指定時）が0以上5以下の数値
    /// 4. genres が文字列の配列（空配列可）
    ///
    /// クライアントが `_id` を送ってきても採用しない（ストアが採番する）。
    pub fn validate(mut payload: Document) -> Result<Self, ValidationError> {
        payload.remove(ID_FIELD);

        let title = take_non_empty_string(&mut payload, "title");
        let author = take_non_empty_string(&mut payload, "author");
        let (Some(title), Some(author)) = (title, author) else {
            return Err(ValidationError::MissingTitleOrAuthor);
        };

        let year = match take_present(&mut payload, "year") {
            None => None,
            Some(Value::Number(year))
                if year
                    .as_f64()
                    .is_some_and(|y| y.fract() == 0.0 && y > MIN_PUBLICATION_YEAR) =>
            {
                Some(year)
            }
            Some(_) => return Err(ValidationError::InvalidYear),
        };

        let rating = match take_present(&mut payload, "rating") {
            None => None,
            Some(Value::Number(rating))
                if rating
                    .as_f64()
                    .is_some_and(|r| (MIN_RATING..=MAX_RATING).contains(&r)) =>
            {
                Some(rating)
            }
            Some(_) => return Err(ValidationError::RatingOutOfRange),
        };

        let genres = match payload.remove("genres") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(genre) => Ok(genre),
                    _ => Err(ValidationError::GenresNotArray),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(ValidationError::GenresNotArray),
        };

        Ok(Self {
            title,
            author,
            year,
            rating,
            genres,
            extra: payload,
        })
    }

    /// 保存用のドキュメントに変換する（追加フィールドも含む）
    pub fn into_document(self) -> Document {
        let mut document = self.extra;
        document.insert("title".into(), Value::String(self.title));
        document.insert("author".into(), Value::String(self.author));
        if let Some(year) = self.year {
            document.insert("year".into(), Value::Number(year));
        }
        if let Some(rating) = self.rating {
            document.insert("rating".into(), Value::Number(rating));
        }
        document.insert(
            "genres".into(),
            Value::Array(self.genres.into_iter().map(Value::String).collect()),
        );
        document
    }
}

/// 部分更新の内容
///
/// 指定されたトップレベルのフィールドだけを既存ドキュメントに上書きする。
/// 値の再検証は行わない。
#[derive(Debug, Clone, PartialEq)]
pub struct BookChanges(Document);

impl BookChanges {
    /// `_id` を取り除いて更新内容を作る
    pub fn from_payload(mut payload: Document) -> Self {
        payload.remove(ID_FIELD);
        Self(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Document {
        &self.0
    }

    /// 対象ドキュメントへマージする（言及されていないフィールドは変更しない）
    pub fn apply_to(&self, target: &mut Document) {
        for (field, value) in &self.0 {
            target.insert(field.clone(), value.clone());
        }
    }
}

fn take_non_empty_string(payload: &mut Document, field: &str) -> Option<String> {
    match payload.remove(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// null は未指定と同じ扱い
fn take_present(payload: &mut Document, field: &str) -> Option<Value> {
    payload.remove(field).filter(|value| !value.is_null())
}
