//! アカウント操作
//!
//! プロフィール・設定・スキャン履歴をバックエンドに読み書きする。
//! 1つの Account は1ユーザー分の操作を担当する。

use crate::backend::{Backend, PROFILES, SCANS, SCAN_IMAGES, USER_SETTINGS};
use crate::error::{ResllError, Result};
use chrono::{DateTime, Utc};
use resll_common::{
    admin_stats, AdminStats, Condition, ListingResult, Plan, ProfitPotential, ScanActivity,
    UserProfile, UserSettings,
};
use serde::{Deserialize, Serialize};

/// 履歴表示の最大件数
pub const HISTORY_LIMIT: usize = 20;

/// user_settings テーブルの行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsRow {
    pub user_id: String,
    pub default_condition: Condition,
    pub default_shipping_cost: f64,
    pub default_fee_rate: f64,
    #[serde(default)]
    pub include_postage_in_profit: bool,
}

impl From<SettingsRow> for UserSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            default_condition: row.default_condition,
            default_shipping_cost: row.default_shipping_cost,
            default_fee_rate: row.default_fee_rate,
            include_postage_in_profit: row.include_postage_in_profit,
        }
    }
}

/// scans テーブルの行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub estimated_price_high: f64,
    #[serde(default)]
    pub thumbnail_url: String,
    pub profit_potential: ProfitPotential,
    pub full_result: ListingResult,
    pub created_at: DateTime<Utc>,
}

impl ScanRecord {
    /// 保存済みのサムネイルURLを付けた結果に戻す
    pub fn into_listing(self) -> ListingResult {
        let mut result = self.full_result;
        if !self.thumbnail_url.is_empty() {
            result.thumbnail = Some(self.thumbnail_url);
        }
        result
    }
}

pub struct Account<B: Backend> {
    backend: B,
    user_id: String,
    email: String,
    free_scan_limit: u32,
}

impl<B: Backend> Account<B> {
    pub fn new(backend: B, user_id: impl Into<String>, email: impl Into<String>, free_scan_limit: u32) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
            email: email.into(),
            free_scan_limit,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// プロフィール取得（なければ無料プランで作成）
    pub fn fetch_profile(&self) -> Result<UserProfile> {
        if let Some(row) = self.backend.get(PROFILES, &self.user_id)? {
            return Ok(serde_json::from_value(row)?);
        }

        let profile = UserProfile {
            id: self.user_id.clone(),
            email: self.email.clone(),
            plan: Plan::Free,
            scans_used: 0,
            scans_limit: self.free_scan_limit,
        };
        self.store_profile(&profile)?;
        tracing::info!(user = %self.user_id, "プロフィールを作成");
        Ok(profile)
    }

    fn store_profile(&self, profile: &UserProfile) -> Result<()> {
        self.backend
            .set(PROFILES, &self.user_id, serde_json::to_value(profile)?)
    }

    /// プラン変更
    pub fn set_plan(&self, plan: Plan) -> Result<UserProfile> {
        let mut profile = self.fetch_profile()?;
        profile.plan = plan;
        self.store_profile(&profile)?;
        Ok(profile)
    }

    /// 無料プランの上限チェック（解析前に呼ぶ）
    pub fn ensure_quota(&self, profile: &UserProfile) -> Result<()> {
        if profile.quota_exhausted() {
            return Err(ResllError::QuotaExceeded {
                used: profile.scans_used,
                limit: profile.scans_limit,
            });
        }
        Ok(())
    }

    /// 設定取得（未保存なら既定値）
    pub fn fetch_settings(&self) -> Result<UserSettings> {
        match self.backend.get(USER_SETTINGS, &self.user_id)? {
            Some(row) => {
                let row: SettingsRow = serde_json::from_value(row)?;
                Ok(row.into())
            }
            None => Ok(UserSettings::default()),
        }
    }

    /// 設定を保存（upsert）
    pub fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        let row = SettingsRow {
            user_id: self.user_id.clone(),
            default_condition: settings.default_condition,
            default_shipping_cost: settings.default_shipping_cost,
            default_fee_rate: settings.default_fee_rate,
            include_postage_in_profit: settings.include_postage_in_profit,
        };
        self.backend
            .set(USER_SETTINGS, &self.user_id, serde_json::to_value(row)?)
    }

    fn user_scans(&self) -> Result<Vec<ScanRecord>> {
        let mut records: Vec<ScanRecord> = decode_rows::<ScanRecord>(SCANS, self.backend.list(SCANS)?)
            .into_iter()
            .filter(|r| r.user_id == self.user_id)
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// 新しい順にスキャン履歴を取得
    pub fn fetch_history(&self, limit: usize) -> Result<Vec<ListingResult>> {
        Ok(self
            .user_scans()?
            .into_iter()
            .take(limit)
            .map(ScanRecord::into_listing)
            .collect())
    }

    /// スキャン1件を取得（他ユーザーの記録は見えない）
    pub fn load_scan(&self, id: &str) -> Result<ListingResult> {
        let row = self
            .backend
            .get(SCANS, id)?
            .ok_or_else(|| ResllError::ScanNotFound(id.to_string()))?;
        let record: ScanRecord = serde_json::from_value(row)?;

        if record.user_id != self.user_id {
            return Err(ResllError::ScanNotFound(id.to_string()));
        }
        Ok(record.into_listing())
    }

    /// 利用回数を1増やす（保存の有無に関係なく解析ごとに呼ぶ）
    pub fn record_usage(&self) -> Result<UserProfile> {
        let mut profile = self.fetch_profile()?;
        profile.scans_used += 1;
        self.store_profile(&profile)?;
        Ok(profile)
    }

    /// 結果を履歴に保存する
    ///
    /// 画像アップロードに失敗してもスキャンは保存する（サムネイルなし）。
    /// 利用回数は record_usage で別に数える。
    pub fn save_to_history(&self, result: &ListingResult, image: Option<&[u8]>) -> Result<ListingResult> {
        let now = Utc::now();
        let thumbnail_url = match image {
            Some(bytes) => {
                let object = format!("{}/{}.jpg", self.user_id, now.timestamp_millis());
                match self.backend.upload(SCAN_IMAGES, &object, bytes) {
                    Ok(()) => self.backend.public_url(SCAN_IMAGES, &object),
                    Err(e) => {
                        tracing::warn!("画像アップロード失敗: {}", e);
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        let record = ScanRecord {
            id: result.id.clone(),
            user_id: self.user_id.clone(),
            title: result.title.clone(),
            brand: result.brand.clone(),
            estimated_price_high: result.estimated_price.high,
            thumbnail_url,
            profit_potential: result.profit_potential,
            full_result: result.clone(),
            created_at: now,
        };
        self.backend
            .set(SCANS, &record.id, serde_json::to_value(&record)?)?;

        Ok(record.into_listing())
    }
}

/// 読めない行は警告して飛ばす
fn decode_rows<T: serde::de::DeserializeOwned>(table: &str, rows: Vec<serde_json::Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(table = %table, "読めない行をスキップ: {}", e);
                None
            }
        })
        .collect()
}

/// 全ユーザーの集計（管理者向け）
pub fn admin_overview<B: Backend>(backend: &B, now: DateTime<Utc>) -> Result<AdminStats> {
    let profiles: Vec<UserProfile> = decode_rows(PROFILES, backend.list(PROFILES)?);
    let scans: Vec<ScanRecord> = decode_rows(SCANS, backend.list(SCANS)?);

    let activity: Vec<ScanActivity<'_>> = scans
        .iter()
        .map(|s| ScanActivity {
            user_id: &s.user_id,
            created_at_ms: s.created_at.timestamp_millis(),
        })
        .collect();

    Ok(admin_stats(&profiles, &activity, now.timestamp_millis()))
}
