//! Resll Common Library
//!
//! CLIと永続化層で共有される型と、モデル応答の後処理

pub mod types;
pub mod error;
pub mod lenient;
pub mod schema;
pub mod prompts;
pub mod gemini;
pub mod parser;
pub mod pricing;
pub mod analyzer;
pub mod stats;

pub use types::{
    AdminStats, ArbitrageAnalysis, Condition, DemandLevel, ImageInput, ItemSpecific,
    ListingResult, ManualInput, NetProfit, ParcelSize, Plan, PlatformSuitability, Pricing,
    ProfitPotential, SearchSource, UserProfile, UserSettings,
};
pub use error::{Error, Result};
pub use schema::listing_schema;
pub use prompts::build_listing_prompt;
pub use gemini::{build_listing_request, GenerateContentRequest, GenerateContentResponse};
pub use parser::{extract_fenced_json, parse_listing_response, ParsedListing};
pub use pricing::{normalize_currency, platform_fee, recompute_arbitrage, round2};
pub use analyzer::{finalize_listing, process_listing_response};
pub use stats::{admin_stats, dashboard_summary, DashboardSummary, ScanActivity};
