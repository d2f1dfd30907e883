use crate::domain::{Book, BookChanges, BookDraft, BookId, BookQuery};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍ドキュメントストアポート
///
/// コレクション単位の検索・追加・部分更新・削除を抽象化する。
/// スキーマ作成やインデックスは行わず、ストアは準備済みであることを前提とする。
/// 各操作はストア側で原子的に実行され、アプリケーション側での排他制御は行わない。
#[async_trait]
pub trait BookStore: Send + Sync {
    /// フィルタと並び替えを適用して書籍を取得する
    ///
    /// 並び替え指定がない場合は挿入順。一致なしは空のVecで、エラーではない。
    async fn find(&self, query: &BookQuery) -> Result<Vec<Book>>;

    /// IDで書籍を取得する
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// 書籍を追加し、ストアが採番したIDを返す
    async fn insert(&self, draft: BookDraft) -> Result<BookId>;

    /// 指定フィールドのみを既存ドキュメントにマージする
    ///
    /// 一致するドキュメントがあった場合に `true` を返す。
    async fn update(&self, id: BookId, changes: &BookChanges) -> Result<bool>;

    /// 書籍を削除する
    ///
    /// 削除された場合に `true` を返す。
    async fn delete(&self, id: BookId) -> Result<bool>;
}
