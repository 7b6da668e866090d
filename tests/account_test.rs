//! アカウント操作テスト
//!
//! 一時ディレクトリの FileBackend でプロフィール・設定・履歴を検証

use chrono::Utc;
use resll::account::{admin_overview, Account, HISTORY_LIMIT};
use resll::backend::{Backend, FileBackend, SCANS};
use resll::error::{ResllError, Result};
use serde_json::Value;
use resll_common::{Condition, ListingResult, Plan, Pricing, ProfitPotential, UserSettings};
use std::time::Duration;
use tempfile::tempdir;

fn account(backend: &FileBackend, user: &str) -> Account<FileBackend> {
    Account::new(backend.clone(), user, format!("{}@example.com", user), 1)
}

fn listing(id: &str, title: &str, high: f64) -> ListingResult {
    ListingResult {
        id: id.to_string(),
        timestamp: Utc::now().timestamp_millis(),
        title: title.to_string(),
        estimated_price: Pricing {
            low: high / 2.0,
            high,
            currency: "£".to_string(),
        },
        profit_potential: ProfitPotential::Medium,
        ..Default::default()
    }
}

#[test]
fn test_profile_created_on_first_fetch() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = account(&backend, "alice");

    let profile = account.fetch_profile().unwrap();
    assert_eq!(profile.id, "alice");
    assert_eq!(profile.email, "alice@example.com");
    assert_eq!(profile.plan, Plan::Free);
    assert_eq!(profile.scans_used, 0);
    assert_eq!(profile.scans_limit, 1);

    // 2回目は保存済みのものを返す
    account.set_plan(Plan::Pro).unwrap();
    assert_eq!(account.fetch_profile().unwrap().plan, Plan::Pro);
}

#[test]
fn test_quota_applies_only_to_free_plan() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = account(&backend, "bob");

    // 保存だけでは数えない
    account.save_to_history(&listing("s1", "Lamp", 20.0), None).unwrap();
    assert_eq!(account.fetch_profile().unwrap().scans_used, 0);

    let profile = account.record_usage().unwrap();
    assert_eq!(profile.scans_used, 1);
    assert_eq!(account.fetch_profile().unwrap().scans_used, 1);

    match account.ensure_quota(&profile) {
        Err(ResllError::QuotaExceeded { used, limit }) => {
            assert_eq!(used, 1);
            assert_eq!(limit, 1);
        }
        other => panic!("Expected QuotaExceeded, got {:?}", other),
    }

    let profile = account.set_plan(Plan::Pro).unwrap();
    assert!(account.ensure_quota(&profile).is_ok());
}

#[test]
fn test_settings_default_and_upsert() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = account(&backend, "carol");

    let settings = account.fetch_settings().unwrap();
    assert_eq!(settings, UserSettings::default());

    let updated = UserSettings {
        default_condition: Condition::LikeNew,
        default_shipping_cost: 4.2,
        default_fee_rate: 10.0,
        include_postage_in_profit: true,
    };
    account.save_settings(&updated).unwrap();
    account.save_settings(&updated).unwrap();

    assert_eq!(account.fetch_settings().unwrap(), updated);
}

#[test]
fn test_history_newest_first_with_limit() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = account(&backend, "dave");

    for i in 0..3 {
        account
            .save_to_history(&listing(&format!("s{}", i), &format!("Item {}", i), 10.0), None)
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
    }

    let history = account.fetch_history(HISTORY_LIMIT).unwrap();
    let ids: Vec<&str> = history.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s1", "s0"]);

    let limited = account.fetch_history(2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, "s2");
}

#[test]
fn test_save_with_thumbnail() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = account(&backend, "erin");

    let saved = account
        .save_to_history(&listing("t1", "Camera", 80.0), Some(b"jpegbytes"))
        .unwrap();

    let thumbnail = saved.thumbnail.expect("thumbnail url");
    assert!(thumbnail.starts_with("file://"));
    assert!(thumbnail.contains("scan_images"));
    assert!(thumbnail.contains("erin/"));

    let loaded = account.load_scan("t1").unwrap();
    assert_eq!(loaded.title, "Camera");
    assert_eq!(loaded.thumbnail.as_deref(), Some(thumbnail.as_str()));
}

#[test]
fn test_scan_of_other_user_is_hidden() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let owner = account(&backend, "frank");
    let other = account(&backend, "grace");

    owner.save_to_history(&listing("p1", "Vase", 15.0), None).unwrap();

    assert!(owner.load_scan("p1").is_ok());
    assert!(matches!(other.load_scan("p1"), Err(ResllError::ScanNotFound(_))));
    assert!(other.fetch_history(HISTORY_LIMIT).unwrap().is_empty());
    assert!(matches!(owner.load_scan("missing"), Err(ResllError::ScanNotFound(_))));
}

#[test]
fn test_admin_overview() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();

    let free = account(&backend, "u1");
    free.fetch_profile().unwrap();
    free.save_to_history(&listing("a1", "Book", 5.0), None).unwrap();

    let pro = account(&backend, "u2");
    pro.set_plan(Plan::Pro).unwrap();
    pro.save_to_history(&listing("a2", "Chair", 40.0), None).unwrap();
    pro.save_to_history(&listing("a3", "Desk", 60.0), None).unwrap();

    let enterprise = account(&backend, "u3");
    enterprise.set_plan(Plan::Enterprise).unwrap();

    let stats = admin_overview(&backend, Utc::now()).unwrap();
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_scans, 3);
    assert_eq!(stats.active_users_24h, 2);
    assert!((stats.mrr - 59.98).abs() < 1e-9);

    // 2日後には誰もアクティブでない
    let later = Utc::now() + chrono::Duration::days(2);
    assert_eq!(admin_overview(&backend, later).unwrap().active_users_24h, 0);
}

/// アップロードが必ず失敗するバックエンド
struct NoStorageBackend(FileBackend);

impl Backend for NoStorageBackend {
    fn get(&self, table: &str, key: &str) -> Result<Option<Value>> {
        self.0.get(table, key)
    }

    fn set(&self, table: &str, key: &str, row: Value) -> Result<()> {
        self.0.set(table, key, row)
    }

    fn list(&self, table: &str) -> Result<Vec<Value>> {
        self.0.list(table)
    }

    fn upload(&self, _bucket: &str, _path: &str, _bytes: &[u8]) -> Result<()> {
        Err(ResllError::Backend("storage unavailable".to_string()))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.0.public_url(bucket, path)
    }
}

#[test]
fn test_upload_failure_saves_without_thumbnail() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = Account::new(NoStorageBackend(backend.clone()), "henry", "", 1);

    let saved = account
        .save_to_history(&listing("n1", "Teapot", 12.0), Some(b"jpegbytes"))
        .unwrap();
    assert!(saved.thumbnail.is_none());

    let row = backend.get(SCANS, "n1").unwrap().expect("scan row");
    assert_eq!(row["thumbnail_url"], "");
    assert_eq!(row["title"], "Teapot");
    assert!(account.load_scan("n1").unwrap().thumbnail.is_none());
}

#[test]
fn test_unreadable_scan_row_is_skipped() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let account = account(&backend, "iris");

    account.save_to_history(&listing("ok1", "Mirror", 30.0), None).unwrap();
    backend
        .set(SCANS, "broken", serde_json::json!({ "user_id": "someone", "title": 5 }))
        .unwrap();

    let history = account.fetch_history(HISTORY_LIMIT).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "ok1");

    let stats = admin_overview(&backend, Utc::now()).unwrap();
    assert_eq!(stats.total_scans, 1);
}
