//! 出品ドラフトの出力スキーマ
//!
//! Gemini の `generationConfig.responseSchema` にそのまま渡す固定スキーマ。
//! フィールド名は ListingResult の camelCase 表記と一致させること。

use crate::types::{Condition, DemandLevel, ParcelSize, ProfitPotential};
use serde_json::{json, Value};

/// モデルに必ず返させるフィールド
pub const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "facebookTitle",
    "etsyTitle",
    "vintedTitle",
    "description",
    "condition",
    "estimatedPrice",
    "profitPotential",
    "demandLevel",
    "vintedParcelSize",
    "platformSuitability",
];

fn labels<T: Copy>(all: &[T], label: fn(&T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(label).collect()
}

/// responseSchema を生成
pub fn listing_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "An SEO-optimized title for eBay UK (max 80 characters). Include Brand, Model, Key Features. Keyword heavy."
            },
            "facebookTitle": {
                "type": "STRING",
                "description": "A human-friendly title for Facebook Marketplace. Short, clean, no keyword stuffing. Format: 'Brand Model - Size/Key Spec'."
            },
            "etsyTitle": {
                "type": "STRING",
                "description": "An aesthetic title for Etsy. Use pipes '|' to separate phrases. Focus on 'Vintage', 'Gift', 'Retro', 'Handmade' keywords if applicable. Max 140 chars."
            },
            "vintedTitle": {
                "type": "STRING",
                "description": "A standardized Vinted title. Format: 'Brand + Item Name + Size + Condition'. E.g. 'Nike Air Max 90 Size 10 Very Good'."
            },
            "description": {
                "type": "STRING",
                "description": "A professional sales description for a UK audience. Use British English spelling (e.g. Colour)."
            },
            "shortDescription": {
                "type": "STRING",
                "description": "A 1-2 sentence punchy summary."
            },
            "category": {
                "type": "STRING",
                "description": "Recommended eBay.co.uk category path."
            },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 5-10 relevant search tags."
            },
            "etsyTags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of exactly 13 short tags optimized for Etsy SEO (e.g. 'Y2K Fashion', 'Gift for Him')."
            },
            "brand": { "type": "STRING", "description": "Brand name if visible." },
            "model": { "type": "STRING", "description": "Model number or name if visible." },
            "era": {
                "type": "STRING",
                "description": "The estimated era or decade of the item (e.g. '1990s', 'Art Deco', 'Modern', 'Vintage')."
            },
            "itemSpecifics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "key": { "type": "STRING" },
                        "value": { "type": "STRING" }
                    }
                },
                "description": "Key-value pairs of product specs (e.g. Colour, Size, Material)."
            },
            "condition": {
                "type": "STRING",
                "enum": labels(Condition::ALL, Condition::as_str),
                "description": "Visual condition assessment."
            },
            "conditionNotes": {
                "type": "STRING",
                "description": "Explanation of condition (e.g. 'Visible scuffs', 'Box included')."
            },
            "estimatedPrice": {
                "type": "OBJECT",
                "properties": {
                    "low": { "type": "NUMBER" },
                    "high": { "type": "NUMBER" },
                    "currency": { "type": "STRING" }
                },
                "description": "Estimated UK market value (£ GBP) based on sold listings."
            },
            "profitPotential": {
                "type": "STRING",
                "enum": labels(ProfitPotential::ALL, ProfitPotential::as_str),
                "description": "Assessment of resell value. High = valuable/collectible. Low = cheap/common."
            },
            "demandLevel": {
                "type": "STRING",
                "enum": labels(DemandLevel::ALL, DemandLevel::as_str),
                "description": "How quickly is this item likely to sell based on popularity?"
            },
            "vintedParcelSize": {
                "type": "STRING",
                "enum": labels(ParcelSize::ALL, ParcelSize::as_str),
                "description": "Estimate Vinted Parcel size. Small (Accessory/T-shirt/Under 500g). Medium (Jeans/Dress/Shoes/Under 1kg). Large (Coat/Boots/Heavy/Over 1kg)."
            },
            "platformSuitability": {
                "type": "OBJECT",
                "properties": {
                    "ebay": { "type": "BOOLEAN", "description": "Almost always True." },
                    "facebook": {
                        "type": "BOOLEAN",
                        "description": "True if item is suitable for local pickup or shipping. False for prohibited items."
                    },
                    "etsy": {
                        "type": "BOOLEAN",
                        "description": "True ONLY if item is Vintage (20+ years old) or Handmade/Craft Supply. False for modern electronics/tools."
                    },
                    "vinted": {
                        "type": "BOOLEAN",
                        "description": "True ONLY if item fits Vinted categories: Clothing, Shoes, Accessories, Beauty, Kids toys, Small Homeware. FALSE for Power Tools, Large Electronics, Kitchen Appliances."
                    }
                },
                "required": ["ebay", "facebook", "etsy", "vinted"],
                "description": "Determine which platforms this item is legally/rules-wise allowed on."
            },
            "arbitrage": {
                "type": "OBJECT",
                "properties": {
                    "isScreenshot": {
                        "type": "BOOLEAN",
                        "description": "True if the image appears to be a screenshot of a marketplace listing (Facebook, Vinted, etc)."
                    },
                    "detectedBuyPrice": {
                        "type": "NUMBER",
                        "description": "If a price is visible in the image (e.g. £20), extract it as the Buy Price. 0 if not found."
                    },
                    "platform": {
                        "type": "STRING",
                        "description": "Name of the platform in the screenshot (e.g. 'Facebook Marketplace', 'Vinted') if applicable."
                    },
                    "ebayFees": { "type": "NUMBER", "description": "Estimated eBay fees based on UK standards." },
                    "shippingCost": { "type": "NUMBER", "description": "Estimated shipping cost." },
                    "roi": {
                        "type": "NUMBER",
                        "description": "Calculated ROI %: ((Sell Price - Buy Price - Fees) / Buy Price) * 100. Use 0 if no buy price."
                    }
                },
                "description": "Analysis of the spread between buying price and selling price."
            }
        },
        "required": REQUIRED_FIELDS
    })
}
