//! Lenient field readers for stored book records.
//!
//! Records written by older versions may carry `year` as text or lack
//! `isComplete`. These readers map any JSON shape to a usable value
//! instead of failing the whole collection.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// テキストから年を読み取る。空文字は0、数値として読めない文字列も0。
pub fn parse_year(text: &str) -> i32 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return saturate(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i32,
        _ => 0,
    }
}

/// 任意のJSON値から年を読み取る。
pub fn year_from_value(value: &Value) -> i32 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => saturate(v),
            None => n.as_f64().map(|v| v.trunc() as i32).unwrap_or(0),
        },
        Value::String(s) => parse_year(s),
        Value::Bool(b) => i32::from(*b),
        _ => 0,
    }
}

/// `bool` 以外（null・欠落・その他の型）はすべて未読扱い。
pub fn flag_from_value(value: &Value) -> bool {
    matches!(value, Value::Bool(true))
}

pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// --- serde `deserialize_with` adapters ---

pub(crate) fn year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Value::deserialize(deserializer).map(|v| year_from_value(&v))
}

pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|v| flag_from_value(&v))
}

pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| text_from_value(&v))
}
