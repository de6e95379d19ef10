use crate::domain::error::DomainError;
use crate::domain::model::book::{Book, BookDraft};
use crate::domain::model::id::{BookId, IdGenerator, TimestampIds};
use crate::domain::repository::KeyValueStore;

use super::notify::{Notifier, ShelfEvent, ShelfListener, SubscriptionId};
use super::storage::StorageAdapter;

/// 読了状態で分けた本棚。並び順はコレクションの順序のまま。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Shelves<'a> {
    pub unfinished: Vec<&'a Book>,
    pub finished: Vec<&'a Book>,
}

/// 書籍コレクションの唯一の所有者。
/// mutate → save → notify のパターンで操作する。
///
/// 対象IDが見つからない操作は何も変更せず、保存も通知もしない。
/// 保存の失敗はログに残して吸収し、メモリ上の変更はそのまま有効とする。
pub struct Bookshelf<S: KeyValueStore> {
    books: Vec<Book>,
    storage: StorageAdapter<S>,
    notifier: Notifier,
    ids: Box<dyn IdGenerator + Send>,
}

impl<S: KeyValueStore> Bookshelf<S> {
    pub fn new(store: S) -> Self {
        Self::with_id_generator(store, TimestampIds)
    }

    pub fn with_id_generator(store: S, ids: impl IdGenerator + Send + 'static) -> Self {
        Self {
            books: Vec::new(),
            storage: StorageAdapter::new(store),
            notifier: Notifier::new(),
            ids: Box::new(ids),
        }
    }

    /// 生成してすぐ保存済みデータを読み込む。
    pub fn open(store: S) -> Self {
        let mut shelf = Self::new(store);
        shelf.load_from_storage();
        shelf
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn storage(&self) -> &StorageAdapter<S> {
        &self.storage
    }

    pub fn subscribe(&mut self, listener: impl ShelfListener + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// 書籍を末尾に追加する。
    pub fn add(&mut self, draft: BookDraft) -> BookId {
        let id = self.ids.next_id();
        tracing::debug!(%id, title = %draft.title, "add book");
        self.books.push(Book::new(id, draft));
        self.commit();
        id
    }

    /// 可変フィールドを上書きする。IDと位置は変わらない。
    pub fn update(&mut self, id: BookId, draft: BookDraft) -> Result<(), DomainError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(DomainError::BookNotFound(id))?;
        tracing::debug!(%id, "update book");
        book.apply(draft);
        self.commit();
        Ok(())
    }

    /// IDが一致する最初の書籍を削除する。
    pub fn delete(&mut self, id: BookId) -> Result<(), DomainError> {
        let index = self.find_index(id).ok_or(DomainError::BookNotFound(id))?;
        tracing::debug!(%id, "delete book");
        self.books.remove(index);
        self.commit();
        Ok(())
    }

    pub fn toggle_completion(&mut self, id: BookId) -> Result<(), DomainError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(DomainError::BookNotFound(id))?;
        book.toggle_completion();
        tracing::debug!(%id, is_complete = book.is_complete(), "toggle completion");
        self.commit();
        Ok(())
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    pub fn find_index(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|b| b.id() == id)
    }

    /// タイトルの大文字小文字を区別しない部分一致。空文字は全件に一致する。
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        let keyword = keyword.to_lowercase();
        self.books
            .iter()
            .filter(|b| b.title_contains(&keyword))
            .collect()
    }

    pub fn shelves(&self) -> Shelves<'_> {
        let (finished, unfinished): (Vec<&Book>, Vec<&Book>) =
            self.books.iter().partition(|b| b.is_complete());
        Shelves {
            unfinished,
            finished,
        }
    }

    /// 保存済みコレクションで置き換えて再描画を通知する。保存はしない。
    ///
    /// 未保存・読み込み失敗の場合は現在のコレクションをそのまま残す。
    pub fn load_from_storage(&mut self) {
        match self.storage.load() {
            Ok(Some(books)) => {
                tracing::debug!(count = books.len(), "loaded books from storage");
                self.books = books;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to load books; keeping current collection");
            }
        }
        self.notifier.emit(ShelfEvent::Changed, &self.books);
    }

    // --- private ---

    fn commit(&mut self) {
        match self.storage.save(&self.books) {
            Ok(true) => self.notifier.emit(ShelfEvent::Persisted, &self.books),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "failed to persist books"),
        }
        self.notifier.emit(ShelfEvent::Changed, &self.books);
    }
}
