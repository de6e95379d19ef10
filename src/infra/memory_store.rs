use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::repository::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("memory store lock poisoned")]
    Poisoned,
}

/// プロセス内のKeyValueStore実装。テストと永続化なし運用で使う。
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: true,
        }
    }

    /// ストレージ非対応環境を模したストア。
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// 初期データ入りのストア。
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// 現在の生データ（テスト検証用）
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn is_available(&self) -> bool {
        self.available
    }

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let entries = self.entries.lock().map_err(|_| MemoryStoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().map_err(|_| MemoryStoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
