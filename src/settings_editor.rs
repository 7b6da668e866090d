//! 対話式設定編集
//!
//! 送料・手数料率・既定の状態を順に尋ねる。Enterで現在値のまま。

use crate::error::{ResllError, Result};
use dialoguer::{Confirm, Input, Select};
use resll_common::{Condition, UserSettings};

/// 手数料率として受け付ける範囲（%）
pub fn validate_fee_rate(rate: f64) -> std::result::Result<(), String> {
    if (0.0..=100.0).contains(&rate) {
        Ok(())
    } else {
        Err("0〜100の範囲で入力してください".to_string())
    }
}

pub fn validate_shipping_cost(cost: f64) -> std::result::Result<(), String> {
    if cost >= 0.0 && cost.is_finite() {
        Ok(())
    } else {
        Err("0以上の金額を入力してください".to_string())
    }
}

/// 対話式で設定を編集
pub fn edit_settings_interactive(current: &UserSettings) -> Result<UserSettings> {
    let prompt_err = |e: dialoguer::Error| ResllError::Prompt(e.to_string());

    let default_shipping_cost: f64 = Input::new()
        .with_prompt("既定の送料 (£)")
        .default(current.default_shipping_cost)
        .validate_with(|v: &f64| validate_shipping_cost(*v))
        .interact_text()
        .map_err(prompt_err)?;

    let default_fee_rate: f64 = Input::new()
        .with_prompt("eBay手数料率 (%)")
        .default(current.default_fee_rate)
        .validate_with(|v: &f64| validate_fee_rate(*v))
        .interact_text()
        .map_err(prompt_err)?;

    let labels: Vec<&str> = Condition::ALL.iter().map(|c| c.as_str()).collect();
    let current_idx = Condition::ALL
        .iter()
        .position(|c| *c == current.default_condition)
        .unwrap_or(0);
    let selected = Select::new()
        .with_prompt("既定の状態")
        .items(&labels)
        .default(current_idx)
        .interact()
        .map_err(prompt_err)?;

    let include_postage_in_profit = Confirm::new()
        .with_prompt("送料を買い手負担として利益から差し引かない")
        .default(current.include_postage_in_profit)
        .interact()
        .map_err(prompt_err)?;

    Ok(UserSettings {
        default_condition: Condition::ALL[selected],
        default_shipping_cost,
        default_fee_rate,
        include_postage_in_profit,
    })
}
