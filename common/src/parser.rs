//! APIレスポンスパーサー
//!
//! モデルの本文テキストから出品ドラフトJSONを取り出す
//!
//! 抽出優先順位:
//! 1. 本文全体をそのままJSONとして解釈
//! 2. ```json ... ``` ブロックの中身
//! 3. エラー

use crate::error::{Error, Result};
use crate::types::ListingResult;
use regex::Regex;
use serde_json::Value;

/// パース済みの出品ドラフト
#[derive(Debug, Clone)]
pub struct ParsedListing {
    pub listing: ListingResult,
    /// estimatedPrice がレスポンスに含まれていたか
    pub has_estimated_price: bool,
}

/// ```json ブロックの中身を抽出
///
/// # Examples
/// ```
/// use resll_common::extract_fenced_json;
///
/// let response = "Here you go:\n```json\n{\"title\": \"Lamp\"}\n```";
/// assert_eq!(extract_fenced_json(response), Some("{\"title\": \"Lamp\"}"));
/// ```
pub fn extract_fenced_json(response: &str) -> Option<&str> {
    lazy_static::lazy_static! {
        static ref FENCE_RE: Regex = Regex::new(r"```json\r?\n([\s\S]*?)\r?\n```").unwrap();
    }

    FENCE_RE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 本文テキストをJSON値として読む（直接 → フェンス の順）
pub fn parse_json_payload(response: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(response.trim()) {
        return Ok(value);
    }

    let fenced = extract_fenced_json(response)
        .ok_or_else(|| Error::Parse("Failed to parse JSON response".into()))?;

    serde_json::from_str(fenced)
        .map_err(|e| Error::Parse(format!("Failed to parse JSON response: {}", e)))
}

/// 出品ドラフトのレスポンスをパース
///
/// # Returns
/// * `Ok(ParsedListing)` - パース成功（id/timestamp は未設定）
/// * `Err` - JSONが見つからない、またはオブジェクトでない
pub fn parse_listing_response(response: &str) -> Result<ParsedListing> {
    let value = parse_json_payload(response)?;

    if !value.is_object() {
        return Err(Error::Parse(format!(
            "Expected a JSON object, got: {}",
            json_kind(&value)
        )));
    }

    let has_estimated_price = value
        .get("estimatedPrice")
        .is_some_and(|v| v.is_object());

    let listing: ListingResult = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("Listing JSON parse error: {}", e)))?;

    Ok(ParsedListing {
        listing,
        has_estimated_price,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
