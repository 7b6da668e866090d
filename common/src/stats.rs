//! ダッシュボード・管理者向け集計

use crate::types::{AdminStats, ListingResult, UserProfile};
use std::collections::HashSet;

/// 利益情報がないスキャンの想定利益率
pub const FALLBACK_PROFIT_RATIO: f64 = 0.3;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// ユーザーダッシュボードの集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_scans: usize,
    /// None = 無制限
    pub scans_left: Option<u32>,
    pub potential_profit: f64,
    pub total_value_found: f64,
}

/// 履歴からダッシュボードを集計
///
/// 想定利益は純利益上限、なければ推定価格上限の30%
pub fn dashboard_summary(history: &[ListingResult], profile: &UserProfile) -> DashboardSummary {
    let potential_profit = history
        .iter()
        .map(|r| {
            r.arbitrage
                .as_ref()
                .map(|a| a.net_profit.high)
                .filter(|p| *p != 0.0)
                .unwrap_or(r.estimated_price.high * FALLBACK_PROFIT_RATIO)
        })
        .sum();

    let total_value_found = history.iter().map(|r| r.estimated_price.high).sum();

    DashboardSummary {
        total_scans: history.len(),
        scans_left: profile.scans_left(),
        potential_profit,
        total_value_found,
    }
}

/// スキャン1件の活動記録（ユーザーID, 作成時刻ms）
#[derive(Debug, Clone, PartialEq)]
pub struct ScanActivity<'a> {
    pub user_id: &'a str,
    pub created_at_ms: i64,
}

/// 管理者向け集計
///
/// MRR は各プロフィールの月額料金の合計
pub fn admin_stats(profiles: &[UserProfile], scans: &[ScanActivity<'_>], now_ms: i64) -> AdminStats {
    let since = now_ms - DAY_MS;
    let active: HashSet<&str> = scans
        .iter()
        .filter(|s| s.created_at_ms > since && s.created_at_ms <= now_ms)
        .map(|s| s.user_id)
        .collect();

    AdminStats {
        mrr: (profiles.iter().map(|p| p.plan.monthly_price()).sum::<f64>() * 100.0).round() / 100.0,
        total_users: profiles.len(),
        active_users_24h: active.len(),
        total_scans: scans.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArbitrageAnalysis, NetProfit, Plan, Pricing};

    fn listing(high: f64, net_high: Option<f64>) -> ListingResult {
        ListingResult {
            estimated_price: Pricing {
                low: 0.0,
                high,
                currency: "£".to_string(),
            },
            arbitrage: net_high.map(|h| ArbitrageAnalysis {
                net_profit: NetProfit { low: 0.0, high: h },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn profile(id: &str, plan: Plan) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            plan,
            scans_limit: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_dashboard_empty() {
        let summary = dashboard_summary(&[], &profile("u1", Plan::Free));
        assert_eq!(summary.total_scans, 0);
        assert_eq!(summary.scans_left, Some(1));
        assert_eq!(summary.potential_profit, 0.0);
        assert_eq!(summary.total_value_found, 0.0);
    }

    #[test]
    fn test_dashboard_profit_fallback() {
        let history = vec![
            listing(100.0, Some(25.0)),
            listing(50.0, None),
            listing(20.0, Some(0.0)),
        ];
        let summary = dashboard_summary(&history, &profile("u1", Plan::Pro));

        // 25 + 50×0.3 + 20×0.3 = 46
        assert!((summary.potential_profit - 46.0).abs() < 1e-9);
        assert_eq!(summary.total_value_found, 170.0);
        assert_eq!(summary.total_scans, 3);
        assert_eq!(summary.scans_left, None);
    }

    #[test]
    fn test_admin_stats() {
        let profiles = vec![
            profile("u1", Plan::Free),
            profile("u2", Plan::Pro),
            profile("u3", Plan::Enterprise),
        ];
        let now = 10 * DAY_MS;
        let scans = vec![
            ScanActivity { user_id: "u1", created_at_ms: now - 1000 },
            ScanActivity { user_id: "u1", created_at_ms: now - 2000 },
            ScanActivity { user_id: "u2", created_at_ms: now - 2 * DAY_MS },
            ScanActivity { user_id: "u3", created_at_ms: now - DAY_MS + 1 },
        ];

        let stats = admin_stats(&profiles, &scans, now);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_scans, 4);
        assert_eq!(stats.active_users_24h, 2);
        assert_eq!(stats.mrr, 59.98);
    }
}
