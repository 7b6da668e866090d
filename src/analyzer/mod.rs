//! 出品ドラフト解析
//!
//! 画像 + 手入力 → Gemini（1回のみ） → JSON修復 → 手数料・利益の再計算
//!
//! 共通ロジックは resll_common から使用

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use resll_common::{
    build_listing_request, process_listing_response, GenerateContentRequest,
    GenerateContentResponse, ImageInput, ListingResult, ManualInput, UserSettings,
};

/// 生成モデルの呼び出し口
///
/// 本番は GeminiClient、テストでは固定応答を返す実装に差し替える
#[allow(async_fn_in_trait)]
pub trait GenerativeModel {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// 商品を解析して出品ドラフトを作る
///
/// # Arguments
/// * `model` - 生成モデル
/// * `images` - 送信する画像（0枚なら手入力のみで生成）
/// * `manual` - 手入力の商品名・状態
/// * `settings` - 送料・手数料率（None なら既定値）
/// * `thinking_budget` - 思考トークン予算
pub async fn analyze_item_for_listing<M: GenerativeModel>(
    model: &M,
    images: &[ImageInput],
    manual: Option<&ManualInput>,
    settings: Option<&UserSettings>,
    thinking_budget: i32,
) -> Result<ListingResult> {
    let request = build_listing_request(images, manual, settings, thinking_budget);
    tracing::debug!(
        images = images.len(),
        manual = manual.is_some(),
        "解析リクエスト作成"
    );

    let outcome = request_listing(model, &request, settings).await;

    if let Err(e) = &outcome {
        tracing::error!("Gemini Analysis Error: {}", e);
    }
    outcome
}

async fn request_listing<M: GenerativeModel>(
    model: &M,
    request: &GenerateContentRequest,
    settings: Option<&UserSettings>,
) -> Result<ListingResult> {
    let response = model.generate_content(request).await?;
    let settings = settings.cloned().unwrap_or_default();
    let listing = process_listing_response(
        &response,
        &settings,
        uuid::Uuid::new_v4().to_string(),
        chrono::Utc::now().timestamp_millis(),
    )?;
    Ok(listing)
}
