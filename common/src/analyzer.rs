//! レスポンス後処理（CLI/テスト共通）
//!
//! モデル応答 → 本文抽出 → JSONパース → 通貨補正 → 利益再計算 → 参照元付与

use crate::error::{Error, Result};
use crate::gemini::GenerateContentResponse;
use crate::parser::{parse_listing_response, ParsedListing};
use crate::pricing::{normalize_currency, recompute_arbitrage};
use crate::types::{ListingResult, SearchSource, UserSettings};

/// パース済みドラフトを確定させる
///
/// # Arguments
/// * `parsed` - parse_listing_response の結果
/// * `sources` - グラウンディング参照元
/// * `settings` - 手数料率・送料
/// * `id` / `timestamp` - 付与するスキャンIDと時刻（UNIXミリ秒）
pub fn finalize_listing(
    parsed: ParsedListing,
    sources: Vec<SearchSource>,
    settings: &UserSettings,
    id: String,
    timestamp: i64,
) -> ListingResult {
    let ParsedListing {
        mut listing,
        has_estimated_price,
    } = parsed;

    normalize_currency(&mut listing.estimated_price);

    if has_estimated_price {
        if let Some(arbitrage) = listing.arbitrage.as_mut() {
            recompute_arbitrage(arbitrage, &listing.estimated_price, settings);
        }
    }

    listing.verified_sources = Some(sources);
    listing.id = id;
    listing.timestamp = timestamp;
    listing
}

/// Gemini応答から出品ドラフトを作る
///
/// 本文が空なら Error::EmptyResponse
pub fn process_listing_response(
    response: &GenerateContentResponse,
    settings: &UserSettings,
    id: String,
    timestamp: i64,
) -> Result<ListingResult> {
    let text = response.text().ok_or(Error::EmptyResponse)?;
    let parsed = parse_listing_response(&text)?;
    Ok(finalize_listing(
        parsed,
        response.verified_sources(),
        settings,
        id,
        timestamp,
    ))
}
