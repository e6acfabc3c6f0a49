use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// Change percentage beyond which a projection is labelled bullish or bearish.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Volatility above which risk is `High`.
pub const HIGH_RISK_VOLATILITY: f64 = 0.25;

/// Volatility above which risk is `Medium`.
pub const MEDIUM_RISK_VOLATILITY: f64 = 0.15;

/// One observed quotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub change_absolute: f64,
    pub change_percent: f64,
}

impl PricePoint {
    pub fn new(
        price: f64,
        change_absolute: f64,
        change_percent: f64,
    ) -> Result<Self, ValidationError> {
        validate_positive("price", price)?;
        validate_finite("change_absolute", change_absolute)?;
        validate_finite("change_percent", change_percent)?;

        Ok(Self {
            price,
            change_absolute,
            change_percent,
        })
    }
}

/// Chronological closing prices, oldest first.
///
/// [`HistoricalSeries::new`] keeps values as given; data sources build series
/// with [`HistoricalSeries::sanitized`] so only finite, positive closes reach
/// the estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalSeries(Vec<f64>);

impl HistoricalSeries {
    pub fn new(closes: Vec<f64>) -> Self {
        Self(closes)
    }

    pub fn sanitized(closes: impl IntoIterator<Item = f64>) -> Self {
        Self(
            closes
                .into_iter()
                .filter(|close| close.is_finite() && *close > 0.0)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for HistoricalSeries {
    fn from(closes: Vec<f64>) -> Self {
        Self::new(closes)
    }
}

/// Canonical latest quote returned by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
    pub as_of: UtcDateTime,
}

impl Quote {
    pub fn new(
        symbol: Symbol,
        point: PricePoint,
        currency: impl AsRef<str>,
        as_of: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol,
            price: point.price,
            change: point.change_absolute,
            change_percent: point.change_percent,
            currency: validate_currency_code(currency.as_ref())?,
            as_of,
        })
    }

    pub fn point(&self) -> PricePoint {
        PricePoint {
            price: self.price,
            change_absolute: self.change,
            change_percent: self.change_percent,
        }
    }
}

/// Qualitative direction of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub fn from_change_percent(change_percent: f64) -> Self {
        if change_percent > TREND_THRESHOLD_PERCENT {
            Self::Bullish
        } else if change_percent < -TREND_THRESHOLD_PERCENT {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk bucket derived from return volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility > HIGH_RISK_VOLATILITY {
            Self::High
        } else if volatility > MEDIUM_RISK_VOLATILITY {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics derived from a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    pub recent_growth: f64,
    pub average_growth: f64,
    /// Population standard deviation of period returns, not annualized.
    pub volatility: f64,
}

/// Forward-looking price estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub price: f64,
    pub change_absolute: f64,
    pub change_percent: f64,
    pub trend: Trend,
    pub confidence: u8,
    pub volatility_percent: f64,
    pub years_ahead: u32,
    pub risk_level: RiskLevel,
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
