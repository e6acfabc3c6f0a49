//! # Estimator
//!
//! Turns a current [`PricePoint`] and a [`HistoricalSeries`] into a
//! [`Projection`].
//!
//! Pure and synchronous: no I/O, no shared state, and identical inputs give
//! bit-identical output. Short histories degrade to a zero contribution
//! instead of failing:
//!
//! | Metric | Needs | Definition |
//! |--------|-------|------------|
//! | recent growth | 6 closes | mean of last 6 vs. mean of the up-to-6 before |
//! | average growth | 12 closes | last close vs. first close |
//! | volatility | 2 closes | population std-dev of period returns |
//!
//! A zero or non-finite denominator also yields 0 for the affected metric.
//! A variance that overflows saturates volatility to infinity, which maps to
//! high risk and the full confidence penalty.

use thiserror::Error;

use crate::{GrowthMetrics, HistoricalSeries, Market, PricePoint, Projection, RiskLevel, Trend};

const RECENT_WINDOW: usize = 6;
const AVERAGE_GROWTH_MIN_LEN: usize = 12;
const VOLATILITY_MIN_LEN: usize = 2;

const SHORT_TERM_WEIGHT_DECAY_PER_YEAR: f64 = 0.1;
const TIME_DECAY_BASE: f64 = 0.95;

const CONFIDENCE_LOSS_PER_YEAR: f64 = 5.0;
const TIME_CONFIDENCE_FLOOR: f64 = 50.0;
const MAX_VOLATILITY_PENALTY: f64 = 20.0;
const CONFIDENCE_FLOOR: f64 = 40.0;
const CONFIDENCE_CEILING: f64 = 100.0;

/// Contract violations rejected by [`project`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EstimateError {
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
}

impl EstimateError {
    const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { field, reason }
    }
}

/// Computes recent growth, average growth and volatility for `series`.
pub fn estimate_growth_metrics(series: &HistoricalSeries) -> GrowthMetrics {
    let closes = series.as_slice();
    GrowthMetrics {
        recent_growth: recent_growth(closes),
        average_growth: average_growth(closes),
        volatility: volatility(closes),
    }
}

/// Projects `current` forward by `years_ahead` years.
pub fn project(
    current: &PricePoint,
    series: &HistoricalSeries,
    years_ahead: u32,
    market: Market,
) -> Result<Projection, EstimateError> {
    validate_inputs(current, series, years_ahead)?;

    let metrics = estimate_growth_metrics(series);
    let years = f64::from(years_ahead);

    let (short_term_weight, long_term_weight) = horizon_weights(years_ahead);
    let weighted_growth =
        metrics.recent_growth * short_term_weight + metrics.average_growth * long_term_weight;
    let adjusted_growth = weighted_growth * time_decay(years_ahead) * market.growth_multiplier();

    let price = current.price * (1.0 + adjusted_growth).powf(years);
    let change_absolute = price - current.price;
    let change_percent = change_absolute / current.price * 100.0;

    Ok(Projection {
        price,
        change_absolute,
        change_percent,
        trend: Trend::from_change_percent(change_percent),
        confidence: confidence(market, years_ahead, metrics.volatility),
        volatility_percent: metrics.volatility * 100.0,
        years_ahead,
        risk_level: RiskLevel::from_volatility(metrics.volatility),
    })
}

/// Short- and long-term growth weights for a horizon; they always sum to 1.
pub fn horizon_weights(years_ahead: u32) -> (f64, f64) {
    let short_term =
        (1.0 - f64::from(years_ahead) * SHORT_TERM_WEIGHT_DECAY_PER_YEAR).max(0.0);
    (short_term, 1.0 - short_term)
}

/// Exponential dampening applied to blended growth, `0.95^(years - 1)`.
pub fn time_decay(years_ahead: u32) -> f64 {
    TIME_DECAY_BASE.powf(f64::from(years_ahead) - 1.0)
}

/// Confidence before the volatility penalty, floored at 50.
pub fn time_confidence(market: Market, years_ahead: u32) -> f64 {
    (market.base_confidence() - f64::from(years_ahead) * CONFIDENCE_LOSS_PER_YEAR)
        .max(TIME_CONFIDENCE_FLOOR)
}

fn confidence(market: Market, years_ahead: u32, volatility: f64) -> u8 {
    let penalty = (volatility * 100.0).min(MAX_VOLATILITY_PENALTY);
    let score = (time_confidence(market, years_ahead) - penalty).round();
    // Clamped to [40, 100], so the cast cannot truncate.
    score.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING) as u8
}

fn validate_inputs(
    current: &PricePoint,
    series: &HistoricalSeries,
    years_ahead: u32,
) -> Result<(), EstimateError> {
    if years_ahead < 1 {
        return Err(EstimateError::invalid("years_ahead", "must be at least 1"));
    }
    if !current.price.is_finite() {
        return Err(EstimateError::invalid("price", "must be finite"));
    }
    if current.price <= 0.0 {
        return Err(EstimateError::invalid("price", "must be greater than zero"));
    }
    if !current.change_absolute.is_finite() || !current.change_percent.is_finite() {
        return Err(EstimateError::invalid("change", "must be finite"));
    }
    if series.as_slice().iter().any(|close| !close.is_finite()) {
        return Err(EstimateError::invalid("series", "closes must be finite"));
    }
    Ok(())
}

fn recent_growth(closes: &[f64]) -> f64 {
    let len = closes.len();
    if len < RECENT_WINDOW {
        return 0.0;
    }

    let split = len - RECENT_WINDOW;
    let older_start = len.saturating_sub(2 * RECENT_WINDOW);
    match (mean(&closes[split..]), mean(&closes[older_start..split])) {
        (Some(recent_avg), Some(older_avg)) => relative_change(older_avg, recent_avg),
        // Exactly six closes leave no older window to compare against.
        _ => 0.0,
    }
}

fn average_growth(closes: &[f64]) -> f64 {
    if closes.len() < AVERAGE_GROWTH_MIN_LEN {
        return 0.0;
    }
    match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) => relative_change(first, last),
        _ => 0.0,
    }
}

fn volatility(closes: &[f64]) -> f64 {
    if closes.len() < VOLATILITY_MIN_LEN {
        return 0.0;
    }

    let Some(returns) = closes
        .windows(2)
        .map(|pair| period_return(pair[0], pair[1]))
        .collect::<Option<Vec<_>>>()
    else {
        return 0.0;
    };
    let Some(mean_return) = mean(&returns) else {
        return 0.0;
    };

    let variance = returns
        .iter()
        .map(|value| (value - mean_return).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    if variance.is_finite() {
        variance.sqrt()
    } else {
        f64::INFINITY
    }
}

fn period_return(previous: f64, current: f64) -> Option<f64> {
    is_usable_denominator(previous).then(|| (current - previous) / previous)
}

fn relative_change(from: f64, to: f64) -> f64 {
    if !is_usable_denominator(from) {
        return 0.0;
    }
    finite_or_zero((to - from) / from)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn is_usable_denominator(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
