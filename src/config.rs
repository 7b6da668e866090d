use crate::error::{ResllError, Result};
use resll_common::gemini::DEFAULT_THINKING_BUDGET;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIキーを読む環境変数（先頭優先）
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "RESLL_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub thinking_budget: i32,
    /// 送信前に縮小する長辺の上限（px）
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    /// このCLIが操作するユーザー
    pub user_id: String,
    pub email: String,
    /// 無料プランの初期スキャン上限
    pub free_scan_limit: u32,
    /// テーブル・ストレージの保存先（None なら既定のデータディレクトリ）
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-pro-preview".into(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            max_image_size: 2048,
            timeout_seconds: 180,
            user_id: "local-user".into(),
            email: String::new(),
            free_scan_limit: 1,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ResllError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("resll").join("config.json"))
    }

    /// テーブル・画像の保存先
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir()
            .ok_or_else(|| ResllError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("resll"))
    }

    /// APIキーを取得（環境変数を優先）
    pub fn get_api_key(&self) -> Result<String> {
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Ok(key.trim().to_string());
                }
            }
        }

        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ResllError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-3-pro-preview");
        assert_eq!(config.thinking_budget, 2048);
        assert_eq!(config.free_scan_limit, 1);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"model": "gemini-2.5-flash"}"#).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.user_id, "local-user");
        assert_eq!(config.timeout_seconds, 180);
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/resll-data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/tmp/resll-data"));
    }
}
