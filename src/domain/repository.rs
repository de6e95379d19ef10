/// 永続化先のキーバリューストア。Infra層が実装する。
///
/// 利用できない環境（保存先が作れない等）では `is_available` が `false` を返す。
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_available(&self) -> bool;
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}
