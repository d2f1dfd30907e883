use crate::domain::{
    Book, BookChanges, BookDraft, BookFilter, BookId, BookQuery, Document, SortDirection,
};
use crate::ports::book_store::{BookStore as BookStoreTrait, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

/// PostgreSQLの行データをBookに変換する
///
/// document列はJSONBのオブジェクトであることを前提とし、
/// それ以外の値が入っていた場合はデータ不整合としてエラーにする。
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let id: Uuid = row.try_get("id")?;
    let document: Value = row.try_get("document")?;

    match document {
        Value::Object(fields) => Ok(Book::new(BookId::from_uuid(id), fields)),
        other => Err(format!("document of book {} is not an object: {}", id, other).into()),
    }
}

/// フィルタ条件をWHERE句として追加する
///
/// 条件はすべてバインドパラメータで渡し、SQLに値を埋め込まない。
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    builder.push(" WHERE TRUE");

    if let Some(author) = &filter.author {
        builder
            .push(" AND document -> 'author' = to_jsonb(")
            .push_bind(author.clone())
            .push("::text)");
    }

    if let Some(available) = filter.available {
        builder
            .push(" AND document -> 'available' = to_jsonb(")
            .push_bind(available)
            .push("::boolean)");
    }

    if let Some(genre) = &filter.genre {
        // 配列要素との一致に加え、genresが単一の文字列の場合も一致とみなす
        builder
            .push(" AND (document -> 'genres' @> jsonb_build_array(")
            .push_bind(genre.clone())
            .push("::text) OR document -> 'genres' = to_jsonb(")
            .push_bind(genre.clone())
            .push("::text))");
    }

    if let Some(min_rating) = filter.min_rating {
        // 数値以外のratingはキャストせずに不一致とする
        builder
            .push(
                " AND CASE WHEN jsonb_typeof(document -> 'rating') = 'number' \
                 THEN (document ->> 'rating')::float8 >= ",
            )
            .push_bind(min_rating)
            .push(" ELSE FALSE END");
    }
}

/// ORDER BY句を追加する
///
/// 昇順では欠落値を先頭、降順では末尾に置き、同値は挿入順（seq）で並べる。
fn push_order(builder: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    builder.push(" ORDER BY ");
    if let Some(sort) = query.sort {
        let direction = match sort.direction {
            SortDirection::Ascending => "ASC NULLS FIRST",
            SortDirection::Descending => "DESC NULLS LAST",
        };
        builder
            .push("document -> '")
            .push(sort.field.as_str())
            .push("' ")
            .push(direction)
            .push(", ");
    }
    builder.push("seq ASC");
}

/// BookStoreのPostgreSQL実装
///
/// 書籍はJSONBドキュメントとして `books` テーブルに保存される。
/// テーブルは事前に用意されていることを前提とし、このアダプターは作成しない。
pub struct BookStore {
    pool: PgPool,
}

impl BookStore {
    /// PostgreSQLコネクションプールから新しいBookStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStoreTrait for BookStore {
    async fn find(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, document FROM books");
        push_filter(&mut builder, &query.filter);
        push_order(&mut builder, query);

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, document
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// IDはストア側で採番し、クライアント指定の `_id` は使わない
    async fn insert(&self, draft: BookDraft) -> Result<BookId> {
        let id = BookId::new();
        let document: Document = draft.into_document();

        sqlx::query(
            r#"
            INSERT INTO books (id, document)
            VALUES ($1, $2)
            "#,
        )
        .bind(id.value())
        .bind(Value::Object(document))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// `||` でトップレベルのフィールドのみを上書きする
    async fn update(&self, id: BookId, changes: &BookChanges) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET document = document || $2
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(Value::Object(changes.fields().clone()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
