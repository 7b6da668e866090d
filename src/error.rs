use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResllError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`resll config --set-api-key YOUR_KEY` または環境変数 GEMINI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("解析対象がありません: 画像を指定するか --product で商品名を入力してください")]
    NothingToAnalyze,

    #[error("無料プランのスキャン上限に達しました ({used}/{limit})。`resll profile --plan pro` でアップグレードしてください")]
    QuotaExceeded { used: u32, limit: u32 },

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("バックエンドエラー: {0}")]
    Backend(String),

    #[error("スキャンが見つかりません: {0}")]
    ScanNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] resll_common::Error),
}

pub type Result<T> = std::result::Result<T, ResllError>;
