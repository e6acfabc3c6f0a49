//! # Domain Models
//!
//! Canonical value types shared by the estimator, data sources and the CLI.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PricePoint`] | Current price with absolute and percentage change |
//! | [`HistoricalSeries`] | Closing prices, oldest first |
//! | [`Quote`] | Price point tagged with symbol, currency and timestamp |
//! | [`GrowthMetrics`] | Recent growth, average growth and volatility |
//! | [`Projection`] | Projected price with trend, confidence and risk |
//! | [`Market`] | Primary (US) or secondary (Nigerian) market regime |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Constructors validate their invariants; everything here is immutable once
//! built and serializes with serde.

mod market;
mod models;
mod symbol;
mod timestamp;

pub use market::Market;
pub use models::{
    validate_currency_code, GrowthMetrics, HistoricalSeries, PricePoint, Projection, Quote,
    RiskLevel, Trend, HIGH_RISK_VOLATILITY, MEDIUM_RISK_VOLATILITY, TREND_THRESHOLD_PERCENT,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
