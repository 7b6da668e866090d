//! 出品ドラフトの型定義
//!
//! CLIと永続化層で共有される型:
//! - ListingResult: 1回のスキャン結果（モデル出力 + ローカル再計算値）
//! - UserSettings: 送料・手数料率などのユーザー設定
//! - UserProfile / AdminStats: プランと利用状況
//!
//! JSONはcamelCaseで保存し、既存のスキャン記録と同じ形を保つ。

use crate::error::{Error, Result};
use crate::lenient::{f64_or_zero, null_as_default, opt_f64};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 既定の送料（£）
pub const DEFAULT_SHIPPING_COST: f64 = 3.50;

/// 既定のeBay手数料率（%）
pub const DEFAULT_FEE_RATE: f64 = 12.8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSpecific {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// 推定価格帯
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub low: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub high: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
}

/// Google検索グラウンディングの参照元
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub default_condition: Condition,
    pub default_shipping_cost: f64,
    /// パーセント表記（例: 12.8）
    pub default_fee_rate: f64,
    /// trueなら送料は買い手負担として利益から差し引かない
    pub include_postage_in_profit: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_condition: Condition::Good,
            default_shipping_cost: DEFAULT_SHIPPING_COST,
            default_fee_rate: DEFAULT_FEE_RATE,
            include_postage_in_profit: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetProfit {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub low: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub high: f64,
}

/// アービトラージ（仕入れ値と販売値の差額）分析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_screenshot: bool,

    /// 画像内に見えた価格（仕入れ値）
    #[serde(default, deserialize_with = "opt_f64", skip_serializing_if = "Option::is_none")]
    pub detected_buy_price: Option<f64>,

    /// 例: "Facebook Marketplace"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "f64_or_zero")]
    pub ebay_fees: f64,

    #[serde(default, deserialize_with = "f64_or_zero")]
    pub shipping_cost: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub net_profit: NetProfit,

    #[serde(default, deserialize_with = "f64_or_zero")]
    pub roi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityReasons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vinted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etsy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSuitability {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ebay: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facebook: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub etsy: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vinted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<SuitabilityReasons>,
}

/// 1回のスキャン結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    #[serde(default)]
    pub id: String,

    /// 解析時刻（UNIXミリ秒）
    #[serde(default)]
    pub timestamp: i64,

    /// ストレージ上のサムネイルURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    // 出品テキスト
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facebook_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub etsy_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vinted_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub etsy_tags: Vec<String>,

    // 商品詳細
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_specifics: Vec<ItemSpecific>,

    // 査定
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition: Condition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition_notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimated_price: Pricing,

    // 判定
    #[serde(default, deserialize_with = "null_as_default")]
    pub profit_potential: ProfitPotential,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demand_level: DemandLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vinted_parcel_size: ParcelSize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_suitability: Option<PlatformSuitability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbitrage: Option<ArbitrageAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_queries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_sources: Option<Vec<SearchSource>>,
}

/// 解析に送る画像1枚
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub base64: String,
    pub mime_type: String,
}

/// ユーザーが手入力した補足情報
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualInput {
    pub product: String,
    pub condition: String,
}

impl ManualInput {
    /// 商品名・状態のどちらかが入っていれば Some
    pub fn from_parts(product: Option<&str>, condition: Option<&str>) -> Option<Self> {
        let product = product.map(str::trim).unwrap_or_default();
        let condition = condition.map(str::trim).unwrap_or_default();

        if product.is_empty() && condition.is_empty() {
            return None;
        }

        Some(Self {
            product: product.to_string(),
            condition: condition.to_string(),
        })
    }
}

/// 列挙型に Display / FromStr / 全値定数を付ける
///
/// FromStr は大文字小文字・空白・区切り文字の違いを無視する。
/// aliases には表示名以外に受け付ける表記を書く。
macro_rules! labelled_enum {
    (
        $name:ident, $what:literal, { $($variant:ident => $label:literal),+ $(,)? }
        $(, aliases { $($alias:literal => $avariant:ident),+ $(,)? })?
    ) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            const ALIASES: &'static [(&'static str, $name)] = &[$($(($alias, $name::$avariant)),+)?];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = normalize_label(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize_label(v.as_str()) == wanted)
                    .or_else(|| {
                        Self::ALIASES
                            .iter()
                            .find(|(alias, _)| normalize_label(alias) == wanted)
                            .map(|(_, v)| *v)
                    })
                    .ok_or_else(|| Error::InvalidValue(format!(
                        "{}: {} (候補: {})",
                        $what,
                        s,
                        Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                    )))
            }
        }
    };
}

/// モデル出力の列挙値を FromStr で読む
///
/// 表記揺れは吸収し、未知の値は警告を出して既定値にする
macro_rules! lenient_enum_deserialize {
    ($($name:ident),+ $(,)?) => {
        $(
            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let value = Option::<Value>::deserialize(deserializer)?;
                    let raw = match value.as_ref() {
                        Some(Value::String(s)) => s.as_str(),
                        None | Some(Value::Null) => return Ok(Self::default()),
                        Some(other) => {
                            tracing::warn!("{} が文字列ではありません: {}", stringify!($name), other);
                            return Ok(Self::default());
                        }
                    };

                    Ok(raw.parse().unwrap_or_else(|e| {
                        tracing::warn!("{}。既定値 {} を使用", e, Self::default());
                        Self::default()
                    }))
                }
            }
        )+
    };
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 商品の状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    #[default]
    Good,
    Fair,
    #[serde(rename = "For Parts")]
    ForParts,
}

labelled_enum!(Condition, "不明な状態", {
    New => "New",
    LikeNew => "Like New",
    Good => "Good",
    Fair => "Fair",
    ForParts => "For Parts",
});

/// 転売価値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ProfitPotential {
    High,
    Medium,
    #[default]
    Low,
}

labelled_enum!(ProfitPotential, "不明な転売価値", {
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

/// 需要の強さ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DemandLevel {
    #[serde(rename = "High Demand")]
    HighDemand,
    #[default]
    Steady,
    #[serde(rename = "Slow Mover")]
    SlowMover,
}

labelled_enum!(DemandLevel, "不明な需要レベル", {
    HighDemand => "High Demand",
    Steady => "Steady",
    SlowMover => "Slow Mover",
}, aliases {
    "High" => HighDemand,
    "Slow" => SlowMover,
});

/// Vintedの配送サイズ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ParcelSize {
    #[default]
    Small,
    Medium,
    Large,
}

labelled_enum!(ParcelSize, "不明な配送サイズ", {
    Small => "Small",
    Medium => "Medium",
    Large => "Large",
});

lenient_enum_deserialize!(Condition, ProfitPotential, DemandLevel, ParcelSize);

/// 契約プラン
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

labelled_enum!(Plan, "不明なプラン", {
    Free => "free",
    Pro => "pro",
    Enterprise => "enterprise",
});

impl Plan {
    /// 月額料金（£）
    pub fn monthly_price(&self) -> f64 {
        match self {
            Plan::Free => 0.0,
            Plan::Pro => 9.99,
            Plan::Enterprise => 49.99,
        }
    }

    /// スキャン回数制限の対象か
    pub fn is_metered(&self) -> bool {
        matches!(self, Plan::Free)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub scans_used: u32,
    #[serde(default)]
    pub scans_limit: u32,
}

impl UserProfile {
    /// 残りスキャン数（有料プランは None = 無制限）
    pub fn scans_left(&self) -> Option<u32> {
        if self.plan.is_metered() {
            Some(self.scans_limit.saturating_sub(self.scans_used))
        } else {
            None
        }
    }

    pub fn quota_exhausted(&self) -> bool {
        self.plan.is_metered() && self.scans_used >= self.scans_limit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub mrr: f64,
    pub total_users: usize,
    pub active_users_24h: usize,
    pub total_scans: usize,
}
