use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resll::account::{admin_overview, Account};
use resll::analyzer::GeminiClient;
use resll::backend::FileBackend;
use resll::scan::{run_scan, ScanRequest};
use resll::{cli, config, error, render, scanner, settings_editor};
use resll_common::dashboard_summary;
use cli::{Cli, Commands};
use config::Config;
use error::{ResllError, Result};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "resll=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    let open_account = |config: &Config| -> Result<Account<FileBackend>> {
        let backend = FileBackend::open(config.resolve_data_dir()?)?;
        Ok(Account::new(
            backend,
            config.user_id.clone(),
            config.email.clone(),
            config.free_scan_limit,
        ))
    };

    match cli.command {
        Commands::Scan { inputs, product, condition, output, json, no_save } => {
            println!("📸 resll - 出品ドラフト生成\n");

            // APIキーはスキャン前に確認
            let api_key = config.get_api_key()?;
            let account = open_account(&config)?;

            println!("[1/3] 写真を確認中...");
            let assets = scanner::collect_media(&inputs)?;
            let images = assets
                .iter()
                .filter(|a| a.kind == scanner::AssetKind::Image)
                .count();
            if assets.len() > images {
                println!("- 動画 {}件は解析対象外のためスキップ", assets.len() - images);
            }
            println!("✔ {}枚の写真を検出\n", images);

            println!("[2/3] AI解析中...");
            let model = GeminiClient::new(api_key, config.model.clone(), config.timeout_seconds)?;
            let request = ScanRequest {
                assets,
                product,
                condition: condition.map(|c| c.to_string()),
                save: !no_save,
            };
            let pb = spinner(&format!("{} で解析中", model.model()));
            let outcome = run_scan(
                &model,
                &account,
                &request,
                config.max_image_size,
                config.thinking_budget,
            )
            .await;
            pb.finish_and_clear();
            let outcome = outcome?;
            println!("✔ 解析完了\n");

            println!("[3/3] 結果を出力中...");
            if outcome.saved {
                println!("✔ 履歴に保存: {}", outcome.listing.id);
            } else if request.save {
                println!("- 履歴への保存に失敗しました（結果は有効です）");
            }
            if let Some(path) = output {
                let content = serde_json::to_string_pretty(&outcome.listing)?;
                std::fs::write(&path, content)?;
                println!("✔ 結果を保存: {}", path.display());
            }
            println!();

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.listing)?);
            } else {
                println!("{}", render::listing_markdown(&outcome.listing));
            }

            println!("✅ 完了");
        }

        Commands::History { limit } => {
            let account = open_account(&config)?;
            let history = account.fetch_history(limit)?;

            if history.is_empty() {
                println!("スキャン履歴はありません");
            } else {
                println!("スキャン履歴（新しい順 {}件）:", history.len());
                for listing in &history {
                    println!("  {}", render::history_line(listing));
                }
            }
        }

        Commands::Show { id, json } => {
            let account = open_account(&config)?;
            let listing = account.load_scan(&id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("{}", render::listing_markdown(&listing));
            }
        }

        Commands::Dashboard => {
            let account = open_account(&config)?;
            let profile = account.fetch_profile()?;
            let history = account.fetch_history(resll::account::HISTORY_LIMIT)?;
            let summary = dashboard_summary(&history, &profile);
            println!("{}", render::dashboard_text(&profile, &summary));
        }

        Commands::Settings { shipping, fee_rate, condition, include_postage, interactive } => {
            let account = open_account(&config)?;
            let mut settings = account.fetch_settings()?;
            let mut changed = false;

            if interactive {
                settings = settings_editor::edit_settings_interactive(&settings)?;
                changed = true;
            }
            if let Some(cost) = shipping {
                settings_editor::validate_shipping_cost(cost).map_err(ResllError::Prompt)?;
                settings.default_shipping_cost = cost;
                changed = true;
            }
            if let Some(rate) = fee_rate {
                settings_editor::validate_fee_rate(rate).map_err(ResllError::Prompt)?;
                settings.default_fee_rate = rate;
                changed = true;
            }
            if let Some(c) = condition {
                settings.default_condition = c;
                changed = true;
            }
            if let Some(flag) = include_postage {
                settings.include_postage_in_profit = flag;
                changed = true;
            }

            if changed {
                account.save_settings(&settings)?;
                println!("✔ 設定を保存しました");
            }

            println!("出品設定:");
            println!("  既定の状態: {}", settings.default_condition);
            println!("  既定の送料: £{:.2}", settings.default_shipping_cost);
            println!("  eBay手数料率: {}% + 30p", settings.default_fee_rate);
            println!(
                "  送料を利益から差し引く: {}",
                if settings.include_postage_in_profit { "いいえ" } else { "はい" }
            );
        }

        Commands::Profile { plan } => {
            let account = open_account(&config)?;
            let profile = match plan {
                Some(plan) => {
                    let profile = account.set_plan(plan)?;
                    println!("✔ プランを {} に変更しました", plan);
                    profile
                }
                None => account.fetch_profile()?,
            };

            println!("プロフィール:");
            println!("  ID: {}", profile.id);
            if !profile.email.is_empty() {
                println!("  メール: {}", profile.email);
            }
            println!("  プラン: {}", profile.plan);
            match profile.scans_left() {
                Some(left) => println!(
                    "  スキャン: {}/{} (残り {})",
                    profile.scans_used, profile.scans_limit, left
                ),
                None => println!("  スキャン: {} (無制限)", profile.scans_used),
            }
        }

        Commands::Admin => {
            let backend = FileBackend::open(config.resolve_data_dir()?)?;
            let stats = admin_overview(&backend, Utc::now())?;

            println!("管理者集計:");
            println!("  MRR: £{:.2}", stats.mrr);
            println!("  ユーザー数: {}", stats.total_users);
            println!("  24時間アクティブ: {}", stats.active_users_24h);
            println!("  総スキャン数: {}", stats.total_scans);
        }

        Commands::Config { set_api_key, set_model, set_user, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }
            if let Some(model) = set_model {
                config.model = model;
                config.save()?;
                println!("✔ モデルを設定しました: {}", config.model);
            }
            if let Some(user) = set_user {
                config.user_id = user;
                config.save()?;
                println!("✔ ユーザーを設定しました: {}", config.user_id);
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  思考トークン上限: {}", config.thinking_budget);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ユーザー: {}", config.user_id);
                println!("  データ: {}", config.resolve_data_dir()?.display());
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
