//! 手数料・利益の再計算
//!
//! モデルが返した手数料や利益の数字は信用せず、ユーザー設定から
//! ローカルで計算し直して上書きする。

use crate::types::{ArbitrageAnalysis, NetProfit, Pricing, UserSettings};

/// eBay固定手数料（£0.30）
pub const FIXED_FEE: f64 = 0.30;

/// ポンド記号
pub const GBP_SYMBOL: &str = "£";

/// 小数点以下2桁に丸める
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 販売価格に対する手数料: price × rate/100 + 0.30
pub fn platform_fee(price: f64, fee_rate: f64) -> f64 {
    price * (fee_rate / 100.0) + FIXED_FEE
}

/// 通貨記号が欠けている・ドル・コード表記なら £ にする
pub fn normalize_currency(pricing: &mut Pricing) {
    let currency = pricing.currency.trim();
    if currency.is_empty() || currency == "$" || currency.eq_ignore_ascii_case("GBP") {
        pricing.currency = GBP_SYMBOL.to_string();
    }
}

/// アービトラージの数値を再計算して上書き
///
/// - 販売価格 = 推定価格の上限
/// - 仕入れ値 = 画像から検出した価格（なければ0）
/// - 送料 = モデルの見積もり（0なら設定値）
/// - 純利益 = 推定価格（下限/上限） − 仕入れ値 − 手数料 − 送料
///
/// include_postage_in_profit が true の場合、送料は差し引かない。
pub fn recompute_arbitrage(
    arbitrage: &mut ArbitrageAnalysis,
    price: &Pricing,
    settings: &UserSettings,
) {
    let sell_price = price.high;
    let buy_price = arbitrage
        .detected_buy_price
        .filter(|p| *p > 0.0)
        .unwrap_or(0.0);

    let fees = platform_fee(sell_price, settings.default_fee_rate);
    let shipping = if arbitrage.shipping_cost > 0.0 {
        arbitrage.shipping_cost
    } else {
        settings.default_shipping_cost
    };
    let deducted_shipping = if settings.include_postage_in_profit {
        0.0
    } else {
        shipping
    };

    let net_low = price.low - buy_price - fees - deducted_shipping;
    let net_high = price.high - buy_price - fees - deducted_shipping;

    arbitrage.ebay_fees = round2(fees);
    arbitrage.shipping_cost = round2(shipping);
    arbitrage.net_profit = NetProfit {
        low: round2(net_low),
        high: round2(net_high),
    };
    arbitrage.roi = if buy_price > 0.0 {
        round2((sell_price - buy_price - fees) / buy_price * 100.0)
    } else {
        0.0
    };
}
