//! 出品ドラフトの表示
//!
//! そのまま貼り付けて共有できる Markdown を生成する

use resll_common::{DashboardSummary, ListingResult, UserProfile};
use std::fmt::Write;

fn money(currency: &str, value: f64) -> String {
    if value < 0.0 {
        format!("-{}{:.2}", currency, -value)
    } else {
        format!("{}{:.2}", currency, value)
    }
}

fn platform_line(out: &mut String, name: &str, title: &str, suitable: Option<bool>) {
    let mark = match suitable {
        Some(false) => " _(not suitable)_",
        _ => "",
    };
    let _ = writeln!(out, "- **{}**{}: {}", name, mark, title);
}

/// 出品ドラフトを Markdown にする
pub fn listing_markdown(listing: &ListingResult) -> String {
    let mut out = String::new();
    let currency = listing.estimated_price.currency.as_str();
    let suit = listing.platform_suitability.as_ref();

    let _ = writeln!(out, "# {}", listing.title);
    if !listing.short_description.is_empty() {
        let _ = writeln!(out, "\n> {}", listing.short_description);
    }

    out.push_str("\n## Titles\n");
    platform_line(&mut out, "eBay", &listing.title, suit.map(|s| s.ebay));
    platform_line(&mut out, "Facebook", &listing.facebook_title, suit.map(|s| s.facebook));
    platform_line(&mut out, "Etsy", &listing.etsy_title, suit.map(|s| s.etsy));
    platform_line(&mut out, "Vinted", &listing.vinted_title, suit.map(|s| s.vinted));

    let _ = writeln!(out, "\n## Description\n{}", listing.description);

    out.push_str("\n## Details\n");
    if !listing.category.is_empty() {
        let _ = writeln!(out, "- Category: {}", listing.category);
    }
    for (label, value) in [
        ("Brand", &listing.brand),
        ("Model", &listing.model),
        ("Era", &listing.era),
    ] {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "- {}: {}", label, v);
        }
    }
    for spec in &listing.item_specifics {
        let _ = writeln!(out, "- {}: {}", spec.key, spec.value);
    }
    let _ = write!(out, "- Condition: {}", listing.condition);
    if !listing.condition_notes.is_empty() {
        let _ = write!(out, " ({})", listing.condition_notes);
    }
    out.push('\n');

    if !listing.keywords.is_empty() {
        let _ = writeln!(out, "\n**Keywords:** {}", listing.keywords.join(", "));
    }
    if !listing.etsy_tags.is_empty() {
        let _ = writeln!(out, "**Etsy tags:** {}", listing.etsy_tags.join(", "));
    }

    out.push_str("\n## Valuation\n");
    let _ = writeln!(
        out,
        "- Estimated price: {} – {}",
        money(currency, listing.estimated_price.low),
        money(currency, listing.estimated_price.high)
    );
    let _ = writeln!(out, "- Profit potential: {}", listing.profit_potential);
    let _ = writeln!(out, "- Demand: {}", listing.demand_level);
    let _ = writeln!(out, "- Vinted parcel: {}", listing.vinted_parcel_size);

    if let Some(arb) = &listing.arbitrage {
        out.push_str("\n## Arbitrage\n");
        if arb.is_screenshot {
            let _ = writeln!(
                out,
                "- Source: screenshot{}",
                arb.platform
                    .as_deref()
                    .map(|p| format!(" ({})", p))
                    .unwrap_or_default()
            );
        }
        if let Some(buy) = arb.detected_buy_price.filter(|p| *p > 0.0) {
            let _ = writeln!(out, "- Buy price: {}", money(currency, buy));
        }
        let _ = writeln!(out, "- eBay fees: {}", money(currency, arb.ebay_fees));
        let _ = writeln!(out, "- Shipping: {}", money(currency, arb.shipping_cost));
        let _ = writeln!(
            out,
            "- Net profit: {} – {}",
            money(currency, arb.net_profit.low),
            money(currency, arb.net_profit.high)
        );
        if arb.roi != 0.0 {
            let _ = writeln!(out, "- ROI: {:.1}%", arb.roi);
        }
    }

    if let Some(sources) = listing.verified_sources.as_ref().filter(|s| !s.is_empty()) {
        out.push_str("\n## Sources\n");
        for source in sources {
            let _ = writeln!(out, "- [{}]({})", source.title, source.uri);
        }
    }

    out
}

/// 履歴一覧の1行
pub fn history_line(listing: &ListingResult) -> String {
    let when = chrono::DateTime::from_timestamp_millis(listing.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {}  {}  Est. {}  [{}]",
        listing.id,
        when,
        listing.title,
        money(&listing.estimated_price.currency, listing.estimated_price.high),
        listing.profit_potential
    )
}

/// ダッシュボード表示
pub fn dashboard_text(profile: &UserProfile, summary: &DashboardSummary) -> String {
    let scans_left = summary
        .scans_left
        .map(|n| n.to_string())
        .unwrap_or_else(|| "無制限".to_string());

    format!(
        "ユーザー: {} ({} プラン)\n  スキャン数: {}\n  残りスキャン: {}\n  想定利益: £{:.0}\n  発見総額: £{:.0}",
        if profile.email.is_empty() { &profile.id } else { &profile.email },
        profile.plan,
        summary.total_scans,
        scans_left,
        summary.potential_profit.floor(),
        summary.total_value_found.floor()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use resll_common::{
        ArbitrageAnalysis, NetProfit, PlatformSuitability, Pricing, SearchSource,
    };

    fn sample() -> ListingResult {
        ListingResult {
            id: "abc".to_string(),
            timestamp: 1_700_000_000_000,
            title: "Nike Air Max 90 Black UK 10".to_string(),
            facebook_title: "Nike Air Max 90 - Size 10".to_string(),
            etsy_title: "Retro Trainers | 90s".to_string(),
            vinted_title: "Nike Air Max 90 Size 10 Good".to_string(),
            description: "Black trainers.".to_string(),
            estimated_price: Pricing {
                low: 40.0,
                high: 60.0,
                currency: "£".to_string(),
            },
            platform_suitability: Some(PlatformSuitability {
                ebay: true,
                facebook: true,
                etsy: false,
                vinted: true,
                reasons: None,
            }),
            arbitrage: Some(ArbitrageAnalysis {
                is_screenshot: true,
                detected_buy_price: Some(20.0),
                platform: Some("Vinted".to_string()),
                ebay_fees: 7.98,
                shipping_cost: 3.5,
                net_profit: NetProfit { low: 8.52, high: 28.52 },
                roi: 160.1,
            }),
            verified_sources: Some(vec![SearchSource {
                title: "eBay sold".to_string(),
                uri: "https://www.ebay.co.uk".to_string(),
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_money_negative() {
        assert_eq!(money("£", -3.5), "-£3.50");
        assert_eq!(money("£", 12.0), "£12.00");
    }

    #[test]
    fn test_markdown_sections() {
        let md = listing_markdown(&sample());
        assert!(md.starts_with("# Nike Air Max 90 Black UK 10"));
        assert!(md.contains("- **Etsy** _(not suitable)_: Retro Trainers | 90s"));
        assert!(md.contains("- **Vinted**: Nike Air Max 90 Size 10 Good"));
        assert!(md.contains("Estimated price: £40.00 – £60.00"));
        assert!(md.contains("Source: screenshot (Vinted)"));
        assert!(md.contains("Buy price: £20.00"));
        assert!(md.contains("Net profit: £8.52 – £28.52"));
        assert!(md.contains("ROI: 160.1%"));
        assert!(md.contains("[eBay sold](https://www.ebay.co.uk)"));
    }

    #[test]
    fn test_markdown_without_arbitrage() {
        let listing = ListingResult {
            arbitrage: None,
            verified_sources: None,
            ..sample()
        };
        let md = listing_markdown(&listing);
        assert!(!md.contains("## Arbitrage"));
        assert!(!md.contains("## Sources"));
    }

    #[test]
    fn test_history_line() {
        let line = history_line(&sample());
        assert!(line.starts_with("abc  2023-11-14"));
        assert!(line.contains("Est. £60.00"));
        assert!(line.contains("[Low]"));
    }
}
