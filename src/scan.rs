//! スキャン処理
//!
//! 上限チェック → 画像準備 → 解析（1回） → 利用回数 → 履歴保存

use crate::account::Account;
use crate::analyzer::{analyze_item_for_listing, GenerativeModel};
use crate::backend::Backend;
use crate::error::{ResllError, Result};
use crate::scanner::{prepare_images, primary_image, MediaAsset};
use resll_common::{ListingResult, ManualInput};

/// スキャンの入力
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub assets: Vec<MediaAsset>,
    pub product: Option<String>,
    /// None ならユーザー設定の既定状態を使う
    pub condition: Option<String>,
    /// false なら履歴に保存しない（利用回数は増える）
    pub save: bool,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub listing: ListingResult,
    pub saved: bool,
}

/// 1件スキャンする
pub async fn run_scan<M, B>(
    model: &M,
    account: &Account<B>,
    request: &ScanRequest,
    max_image_size: u32,
    thinking_budget: i32,
) -> Result<ScanOutcome>
where
    M: GenerativeModel,
    B: Backend,
{
    let profile = account.fetch_profile()?;
    account.ensure_quota(&profile)?;

    let settings = account.fetch_settings()?;
    let images = prepare_images(&request.assets, max_image_size)?;

    let has_product = request
        .product
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    if images.is_empty() && !has_product {
        return Err(ResllError::NothingToAnalyze);
    }

    let default_condition = settings.default_condition.to_string();
    let manual = ManualInput::from_parts(
        request.product.as_deref(),
        Some(request.condition.as_deref().unwrap_or(&default_condition)),
    );

    tracing::info!(
        images = images.len(),
        skipped = request.assets.len() - images.len(),
        "解析開始"
    );
    let listing =
        analyze_item_for_listing(model, &images, manual.as_ref(), Some(&settings), thinking_budget)
            .await?;

    // 保存しない場合も1回として数える
    if let Err(e) = account.record_usage() {
        tracing::warn!("利用回数の更新に失敗: {}", e);
    }

    if !request.save {
        return Ok(ScanOutcome {
            listing,
            saved: false,
        });
    }

    let thumbnail = primary_image(&request.assets).unwrap_or_else(|e| {
        tracing::warn!("サムネイル読み込み失敗: {}", e);
        None
    });

    match account.save_to_history(&listing, thumbnail.as_deref()) {
        Ok(saved) => Ok(ScanOutcome {
            listing: saved,
            saved: true,
        }),
        Err(e) => {
            tracing::warn!("履歴保存に失敗（結果は表示します）: {}", e);
            Ok(ScanOutcome {
                listing,
                saved: false,
            })
        }
    }
}
