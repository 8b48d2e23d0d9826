//! 寬鬆的欄位反序列化
//!
//! 前端送來的值可能是數字、數字字串、空字串或 null；
//! 資料列的數值欄位一律收斂成 `Decimal`，列舉欄位空白時視為未設定。

use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 數值欄位：數字、數字字串皆可，空白與 null 視為 0
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::String(text)) => parse_decimal(&text).map_err(de::Error::custom),
        Some(Value::Number(number)) => {
            parse_decimal(&number.to_string()).map_err(de::Error::custom)
        }
        Some(other) => Err(de::Error::custom(format!("不是數值: {}", other))),
    }
}

/// 解析數值文字（允許科學記號與前後空白）
pub fn parse_decimal(text: &str) -> Result<Decimal, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| format!("不是數值: {}", trimmed))
}

/// 列舉欄位：空白與 null 視為 `None`，其餘交給 `FromStr`
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(de::Error::custom),
    }
}

/// 整數欄位：空白與 null 視為 `None`
pub fn optional_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("不是整數: {}", text))),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("不是整數: {}", number))),
        Some(other) => Err(de::Error::custom(format!("不是整數: {}", other))),
    }
}
