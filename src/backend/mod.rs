//! 永続化サービス
//!
//! 認証・テーブル・ファイルストレージを提供するホスト型バックエンドを
//! get/set/list + upload の最小インターフェースとして扱う。
//!
//! ## テーブル
//! - profiles: ユーザーのプランと利用回数
//! - user_settings: 送料・手数料率など
//! - scans: スキャン履歴
//!
//! ## バケット
//! - scan_images: サムネイル画像

mod file;

pub use file::FileBackend;

use crate::error::Result;
use serde_json::Value;

pub const PROFILES: &str = "profiles";
pub const USER_SETTINGS: &str = "user_settings";
pub const SCANS: &str = "scans";
pub const SCAN_IMAGES: &str = "scan_images";

pub trait Backend {
    /// キーで1行取得
    fn get(&self, table: &str, key: &str) -> Result<Option<Value>>;

    /// 1行を挿入または上書き（upsert）
    fn set(&self, table: &str, key: &str, row: Value) -> Result<()>;

    /// テーブルの全行
    fn list(&self, table: &str) -> Result<Vec<Value>>;

    /// バケットにファイルを保存
    fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()>;

    /// 保存済みファイルの公開URL
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
