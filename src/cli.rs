use clap::{Parser, Subcommand};
use resll_common::{Condition, Plan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resll")]
#[command(about = "写真から eBay / Facebook / Etsy / Vinted 向け出品ドラフトを生成", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真（またはスクリーンショット）を解析して出品ドラフトを生成
    Scan {
        /// 写真ファイルまたはフォルダ（省略時は --product が必須）
        inputs: Vec<PathBuf>,

        /// 商品名を明示（例: "Nike Air Max 90 Black Size 10"）
        #[arg(short, long)]
        product: Option<String>,

        /// 状態を明示（省略時は設定の既定値）
        #[arg(short, long)]
        condition: Option<Condition>,

        /// 結果JSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Markdownではなく JSON を表示
        #[arg(long)]
        json: bool,

        /// 履歴に保存しない
        #[arg(long)]
        no_save: bool,
    },

    /// スキャン履歴を表示（新しい順）
    History {
        /// 表示件数
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// 履歴のスキャンを1件表示
    Show {
        /// スキャンID
        #[arg(required = true)]
        id: String,

        /// JSON で表示
        #[arg(long)]
        json: bool,
    },

    /// 利用状況と想定利益の集計
    Dashboard,

    /// 送料・手数料率などの設定を表示/編集
    Settings {
        /// 既定の送料（£）
        #[arg(long)]
        shipping: Option<f64>,

        /// eBay手数料率（%）
        #[arg(long)]
        fee_rate: Option<f64>,

        /// 既定の状態
        #[arg(long)]
        condition: Option<Condition>,

        /// 送料を利益から差し引かない
        #[arg(long)]
        include_postage: Option<bool>,

        /// 対話式で編集
        #[arg(short, long)]
        interactive: bool,
    },

    /// プロフィールを表示/プランを変更
    Profile {
        /// プランを変更 (free/pro/enterprise)
        #[arg(long)]
        plan: Option<Plan>,
    },

    /// 全ユーザーの集計（管理者向け）
    Admin,

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// ユーザーIDを設定
        #[arg(long)]
        set_user: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
