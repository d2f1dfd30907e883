use crate::domain::{Book, BookChanges, BookDraft, BookId, BookQuery};
use crate::ports::book_store::{BookStore as BookStoreTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// BookStoreのインメモリ実装
///
/// ドキュメントを挿入順に保持し、PostgreSQLアダプターと同じ
/// フィルタ・並び替えの規則を適用する。テストやデータベースなしの
/// ローカル実行で使用する。
pub struct BookStore {
    books: Mutex<Vec<Book>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(Vec::new()),
        }
    }

    /// 保存されているドキュメント数
    pub fn len(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStoreTrait for BookStore {
    async fn find(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let books = self.books.lock().unwrap();
        let mut found: Vec<Book> = books
            .iter()
            .filter(|book| query.filter.matches(&book.fields))
            .cloned()
            .collect();

        // 安定ソートなので同値の場合は挿入順が保たれる
        if let Some(sort) = query.sort {
            found.sort_by(|a, b| sort.compare(&a.fields, &b.fields));
        }

        Ok(found)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let books = self.books.lock().unwrap();
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn insert(&self, draft: BookDraft) -> Result<BookId> {
        let id = BookId::new();
        self.books
            .lock()
            .unwrap()
            .push(Book::new(id, draft.into_document()));
        Ok(id)
    }

    async fn update(&self, id: BookId, changes: &BookChanges) -> Result<bool> {
        let mut books = self.books.lock().unwrap();
        match books.iter_mut().find(|book| book.id == id) {
            Some(book) => {
                changes.apply_to(&mut book.fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok(books.len() < before)
    }
}
