//! プロンプト生成モジュール
//!
//! - build_listing_prompt: 出品ドラフト生成用プロンプト
//!
//! 手数料率と送料はユーザー設定から埋め込む。モデルの計算結果は
//! 後段の pricing で再計算されるので、ここでの値はあくまで目安。

use crate::types::{ManualInput, UserSettings, DEFAULT_FEE_RATE, DEFAULT_SHIPPING_COST};

/// 出品ドラフト生成プロンプト
///
/// # Arguments
/// * `manual` - ユーザーが入力した商品名・状態（空欄は無視）
/// * `settings` - 送料・手数料率（None なら既定値）
pub fn build_listing_prompt(manual: Option<&ManualInput>, settings: Option<&UserSettings>) -> String {
    let shipping_cost = settings
        .map(|s| s.default_shipping_cost)
        .unwrap_or(DEFAULT_SHIPPING_COST);
    let fee_rate = settings
        .map(|s| s.default_fee_rate)
        .unwrap_or(DEFAULT_FEE_RATE);

    let mut prompt = String::from(
        r#"You are an expert UK Reseller, Vintage Curator, and Arbitrage Specialist.

YOUR TASK:
Analyze the input images to create a professional listing optimized for FOUR platforms: eBay, Facebook Marketplace, Etsy, and Vinted.
Use ALL provided images to gather details (e.g. look for tags, defects, brand logos across different angles).
"#,
    );

    if let Some(manual) = manual {
        let product = manual.product.trim();
        if !product.is_empty() {
            prompt.push_str(&format!(
                "\nUSER CONTEXT: The user has explicitly identified the item as: \"{}\". Prioritize this identification.",
                product
            ));
        }
        let condition = manual.condition.trim();
        if !condition.is_empty() {
            prompt.push_str(&format!(
                "\nUSER CONTEXT: The user specifies the condition is: \"{}\". Adjust your pricing and description to match this condition.",
                condition
            ));
        }
    }

    prompt.push_str(&format!(
        r#"
STEP 1: DETECT MODE
- If an image is provided: Is this a screenshot of a listing? If yes, extract the ASKING PRICE shown in the image. This is the "Buy Price".
- If it is a normal photo or no photo is provided, the "Buy Price" is 0/Unknown.

STEP 2: VALUATION & ERA
- Identify the item precisely.
- Estimate the ERA/DECADE (e.g. 1970s, 90s, Modern). Crucial for Etsy.
- Search for 'sold' listings on eBay.co.uk to find the TRUE market value in GBP (£).

STEP 3: PLATFORM SUITABILITY (CRITICAL)
- JUDGE STRICTLY: Is this item allowed on Vinted? (YES: Clothes, Shoes, Accessories, Beauty, Kids toys, Small Homeware. NO: Power Tools, Kitchen Appliances, Large Tech).
- JUDGE STRICTLY: Is this item allowed on Etsy? (YES: Vintage 20+ years, Handmade. NO: Modern mass-produced electronics/tools).

STEP 4: ARBITRAGE CALCULATION
- Calculate eBay Fees using a rate of {fee_rate}% + 30p.
- Assume Shipping Cost is £{shipping_cost:.2} (unless item is very large/heavy, then adjust up).
- If a Buy Price was detected, calculate the Net Profit and ROI.

STEP 5: LISTING CREATION
- Create FOUR titles (even if platform is unsuitable, generate just in case):
  1. eBay Title: Keyword rich, max 80 chars. (Technical)
  2. Facebook Title: Short, friendly, no spam keywords. (Human)
  3. Etsy Title: Aesthetic, descriptive, uses dividers. "Vintage [Item] | [Era] Style | Gift for Him".
  4. Vinted Title: "Brand Item Size Condition". E.g. "Zara Jeans 32W Very Good".
- Generate exactly 13 short, punchy tags for Etsy.
- Determine Vinted Parcel Size (Small/Medium/Large) based on item bulk.
- Write a professional description suitable for all platforms.

Use the 'googleSearch' tool to find accurate UK pricing and specs.
"#
    ));

    prompt
}
