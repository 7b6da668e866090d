//! モデル出力の緩いデシリアライザ
//!
//! responseSchema を指定してもモデルは時々規約を外す:
//! - 数値が "£20" や "1,200.50" のような文字列で返る
//! - 文字列・配列・真偽値に null が入る
//!
//! ここのヘルパーは `#[serde(default, deserialize_with = "...")]` で使う。

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// null を型のデフォルト値として扱う
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 数値または数値文字列を f64 として読む（読めなければ 0.0）
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?.unwrap_or(0.0))
}

/// 数値または数値文字列を Option<f64> として読む
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// JSON値から金額を取り出す
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_money(s),
        _ => None,
    }
}

/// "£1,200.50" → 1200.5
///
/// 通貨記号・桁区切り・空白を除去してから数値化する
pub fn parse_money(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
