use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

/// 書籍ID。生成時刻（ミリ秒）由来の整数で、生成後は不変。
///
/// フォーム経由で文字列として戻ってくるIDも、境界でこの型に正規化してから比較する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 整数値を表すf64のみ受け付ける（`12.0` は可、`12.5` は不可）。
    fn from_f64(value: f64) -> Option<Self> {
        if value.is_finite()
            && value.fract() == 0.0
            && value >= i64::MIN as f64
            && value <= i64::MAX as f64
        {
            Some(Self(value as i64))
        } else {
            None
        }
    }
}

impl From<i64> for BookId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Ok(Self(v));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Self::from_f64)
            .ok_or_else(|| DomainError::InvalidBookId(s.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBookId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawBookId::deserialize(deserializer)? {
            RawBookId::Int(v) => Ok(Self(v)),
            RawBookId::Float(v) => Self::from_f64(v)
                .ok_or_else(|| serde::de::Error::custom(format!("non-integral book id: {v}"))),
            RawBookId::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// ID採番の抽象。テストでは決定的な実装に差し替える。
pub trait IdGenerator {
    fn next_id(&mut self) -> BookId;
}

/// 現在時刻（UNIXエポックからのミリ秒）をIDとする採番器。
///
/// 同一ミリ秒内に2回呼ばれるとIDが衝突する。操作はユーザー操作起点なので許容している。
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIds;

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> BookId {
        BookId(chrono::Utc::now().timestamp_millis())
    }
}
