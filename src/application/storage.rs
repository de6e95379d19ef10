use std::collections::HashSet;

use serde_json::Value;

use crate::domain::model::book::Book;
use crate::domain::repository::KeyValueStore;

use super::error::AppError;

/// 本棚全体を保存するキー。
pub const STORAGE_KEY: &str = "bookshelf_app";

/// 書籍コレクションとKeyValueStoreの橋渡し。
/// コレクション全体を1つのJSON配列として `STORAGE_KEY` に読み書きする。
///
/// ストアの利用可否は生成時に1度だけ確認する。利用不可なら `load` は常に `None`、
/// `save` は何もしない。
pub struct StorageAdapter<S: KeyValueStore> {
    store: S,
    available: bool,
}

impl<S: KeyValueStore> StorageAdapter<S> {
    pub fn new(store: S) -> Self {
        let available = store.is_available();
        if !available {
            tracing::warn!("persistent storage unavailable; running in memory only");
        }
        Self { store, available }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// コレクション全体を保存する。実際に書き込んだ場合 `true`。
    pub fn save(&self, books: &[Book]) -> Result<bool, AppError> {
        if !self.available {
            return Ok(false);
        }
        let content = serde_json::to_string(books).map_err(|e| AppError::Storage(Box::new(e)))?;
        self.store
            .set(STORAGE_KEY, &content)
            .map_err(|e| AppError::Storage(Box::new(e)))?;
        Ok(true)
    }

    /// 保存済みコレクションを読み込む。未保存なら `None`。
    ///
    /// 配列の各要素は個別に読み、読めない要素と重複IDは警告して捨てる。
    pub fn load(&self) -> Result<Option<Vec<Book>>, AppError> {
        if !self.available {
            return Ok(None);
        }
        let Some(content) = self
            .store
            .get(STORAGE_KEY)
            .map_err(|e| AppError::Storage(Box::new(e)))?
        else {
            return Ok(None);
        };

        let records: Vec<Value> = serde_json::from_str(&content).map_err(AppError::Malformed)?;
        let mut seen = HashSet::new();
        let mut books = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Book>(record) {
                Ok(book) if seen.insert(book.id()) => books.push(book),
                Ok(book) => {
                    tracing::warn!(index, id = %book.id(), "dropping stored record with duplicate id");
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping unreadable stored record");
                }
            }
        }
        Ok(Some(books))
    }
}
