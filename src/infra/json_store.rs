use std::path::PathBuf;

use crate::domain::repository::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid key: '{0}'")]
    InvalidKey(String),
}

/// ディレクトリ配下のJSONファイルによるKeyValueStore実装。
/// 1 key = 1 JSONファイル（`<dir>/<key>.json`）。
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// keyに対応するファイルパス。パス区切りや `..` を含むkeyは拒否する。
    pub fn path_for(&self, key: &str) -> Result<PathBuf, JsonStoreError> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(JsonStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    type Error = JsonStoreError;

    /// ディレクトリが存在する（または作成できる）場合のみ利用可能。
    fn is_available(&self) -> bool {
        if self.dir.is_dir() {
            return true;
        }
        std::fs::create_dir_all(&self.dir).is_ok()
    }

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
