//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use resll::error::ResllError;
use resll::scanner;
use std::path::PathBuf;
use tempfile::tempdir;

/// 存在しないパスを指定した場合
#[test]
fn test_collect_nonexistent_path() {
    let result = scanner::collect_media(&[PathBuf::from("/nonexistent/path/12345")]);
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ResllError::FileNotFound(_)));
}

/// 空のフォルダを指定した場合
#[test]
fn test_collect_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::collect_media(&[dir.path().to_path_buf()]);

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 写真のないフォルダを指定した場合
#[test]
fn test_collect_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::collect_media(&[dir.path().to_path_buf()]);
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// ResllErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ResllError::Config("テスト設定エラー".to_string()),
        ResllError::FileNotFound("test.jpg".to_string()),
        ResllError::ImageLoad("壊れた画像".to_string()),
        ResllError::NothingToAnalyze,
        ResllError::QuotaExceeded { used: 1, limit: 1 },
        ResllError::ApiCall("API呼び出し失敗".to_string()),
        ResllError::Backend("書き込み失敗".to_string()),
        ResllError::ScanNotFound("abc".to_string()),
        ResllError::Prompt("中断".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = format!("{}", ResllError::MissingApiKey);

    assert!(display.contains("APIキー"));
    assert!(display.contains("resll config"));
    assert!(display.contains("GEMINI_API_KEY"));
}

/// 上限エラーは利用数と上限を含む
#[test]
fn test_quota_exceeded_message() {
    let display = format!("{}", ResllError::QuotaExceeded { used: 3, limit: 3 });

    assert!(display.contains("3/3"));
    assert!(display.contains("--plan pro"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ResllError = io_err.into();

    assert!(matches!(err, ResllError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ResllError = json_err.into();

    assert!(matches!(err, ResllError::JsonParse(_)));
}

/// resll_common::Errorは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let err: ResllError = resll_common::Error::EmptyResponse.into();

    assert!(matches!(err, ResllError::Common(_)));
    assert_eq!(format!("{}", err), "No response received from the model.");
}
