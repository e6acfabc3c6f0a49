//! Human-facing reading of a [`Prediction`]: trend wording, momentum,
//! support/resistance and formatted figures.

use pricecast_core::{Market, Prediction, RiskLevel, Trend};
use serde::Serialize;

const SUPPORT_RATIO: f64 = 0.9;
const RESISTANCE_RATIO: f64 = 1.15;
const STRONG_MOMENTUM_VOLATILITY_PERCENT: f64 = 20.0;
const MODERATE_MOMENTUM_VOLATILITY_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Momentum {
    Strong,
    Moderate,
    Weak,
}

impl Momentum {
    pub fn from_volatility_percent(volatility_percent: f64) -> Self {
        if volatility_percent > STRONG_MOMENTUM_VOLATILITY_PERCENT {
            Self::Strong
        } else if volatility_percent > MODERATE_MOMENTUM_VOLATILITY_PERCENT {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub market_badge: &'static str,
    pub headline: &'static str,
    pub description: &'static str,
    pub price_movement: &'static str,
    pub market_conditions: &'static str,
    pub momentum: Momentum,
    pub support_level: f64,
    pub resistance_level: f64,
    pub risk_gauge: u8,
    pub horizon: String,
    pub display: DisplayFigures,
}

/// Pre-formatted strings for terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFigures {
    pub current_price: String,
    pub daily_change: String,
    pub projected_price: String,
    pub projected_change: String,
    pub expected_return: String,
    pub volatility: String,
    pub support: String,
    pub resistance: String,
}

impl Analysis {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let market = prediction.market;
        let projection = &prediction.projection;
        let current = prediction.quote.price;
        let support_level = current * SUPPORT_RATIO;
        let resistance_level = current * RESISTANCE_RATIO;
        let wording = TrendWording::for_trend(projection.trend);

        Self {
            market_badge: market.label(),
            headline: wording.headline,
            description: wording.description,
            price_movement: wording.price_movement,
            market_conditions: wording.market_conditions,
            momentum: Momentum::from_volatility_percent(projection.volatility_percent),
            support_level,
            resistance_level,
            risk_gauge: risk_gauge(projection.risk_level),
            horizon: horizon_text(projection.years_ahead),
            display: DisplayFigures {
                current_price: format_price(market, current),
                daily_change: signed_percent(prediction.quote.change_percent, 2),
                projected_price: format_price(market, projection.price),
                projected_change: signed_percent(projection.change_percent, 2),
                expected_return: signed_percent(projection.change_percent, 1),
                volatility: format!("{:.1}%", projection.volatility_percent),
                support: format_price(market, support_level),
                resistance: format_price(market, resistance_level),
            },
        }
    }
}

struct TrendWording {
    headline: &'static str,
    description: &'static str,
    price_movement: &'static str,
    market_conditions: &'static str,
}

impl TrendWording {
    const fn for_trend(trend: Trend) -> Self {
        match trend {
            Trend::Bullish => Self {
                headline: "Bullish Trend",
                description: "Strong upward momentum expected",
                price_movement: "Historical analysis indicates strong growth potential with positive momentum indicators.",
                market_conditions: "Current market conditions and sector performance support this bullish outlook.",
            },
            Trend::Bearish => Self {
                headline: "Bearish Trend",
                description: "Downward pressure anticipated",
                price_movement: "Technical indicators suggest potential downward pressure in the forecast period.",
                market_conditions: "Market headwinds and sector challenges may impact performance negatively.",
            },
            Trend::Neutral => Self {
                headline: "Neutral Trend",
                description: "Sideways movement expected",
                price_movement: "Mixed signals indicate a balanced outlook with moderate price movements expected.",
                market_conditions: "Stable market conditions suggest sideways trading within established ranges.",
            },
        }
    }
}

pub const fn risk_gauge(risk_level: RiskLevel) -> u8 {
    match risk_level {
        RiskLevel::High => 80,
        RiskLevel::Medium => 60,
        RiskLevel::Low => 40,
    }
}

pub fn horizon_text(years_ahead: u32) -> String {
    let unit = if years_ahead == 1 { "year" } else { "years" };
    format!("{years_ahead} {unit} ahead")
}

pub const fn currency_symbol(market: Market) -> &'static str {
    match market {
        Market::Primary => "$",
        Market::Secondary => "₦",
    }
}

pub fn format_price(market: Market, value: f64) -> String {
    format!("{}{value:.2}", currency_symbol(market))
}

pub fn signed_percent(value: f64, decimals: usize) -> String {
    // Avoid rendering negative zero as "+-0.00%".
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.decimals$}%")
}

#[cfg(test)]
mod tests {
    use pricecast_core::{
        GrowthMetrics, PricePoint, Projection, ProviderId, Quote, Symbol, UtcDateTime,
    };

    use super::*;

    fn prediction(market: Market, trend: Trend, risk_level: RiskLevel) -> Prediction {
        let point = PricePoint::new(100.0, 1.5, 1.5).expect("valid point");
        Prediction {
            symbol: Symbol::parse("GTCO").expect("valid symbol"),
            company_name: None,
            market,
            source: ProviderId::default_for(market),
            quote: Quote::new(
                Symbol::parse("GTCO").expect("valid symbol"),
                point,
                market.currency(),
                UtcDateTime::now(),
            )
            .expect("valid quote"),
            history_len: 24,
            target_year: 2029,
            metrics: GrowthMetrics {
                recent_growth: 0.1,
                average_growth: 0.2,
                volatility: 0.123,
            },
            projection: Projection {
                price: 123.456,
                change_absolute: 23.456,
                change_percent: 23.456,
                trend,
                confidence: 70,
                volatility_percent: 12.3,
                years_ahead: 3,
                risk_level,
            },
        }
    }

    #[test]
    fn formats_secondary_market_figures_in_naira() {
        let analysis =
            Analysis::from_prediction(&prediction(Market::Secondary, Trend::Bullish, RiskLevel::Low));

        assert_eq!(analysis.market_badge, "Nigerian Market");
        assert_eq!(analysis.headline, "Bullish Trend");
        assert_eq!(analysis.display.current_price, "₦100.00");
        assert_eq!(analysis.display.projected_price, "₦123.46");
        assert_eq!(analysis.display.expected_return, "+23.5%");
        assert_eq!(analysis.display.support, "₦90.00");
        assert_eq!(analysis.display.resistance, "₦115.00");
        assert_eq!(analysis.display.volatility, "12.3%");
        assert_eq!(analysis.momentum, Momentum::Moderate);
        assert_eq!(analysis.risk_gauge, 40);
        assert_eq!(analysis.horizon, "3 years ahead");
    }

    #[test]
    fn bearish_wording_and_high_risk_gauge() {
        let analysis =
            Analysis::from_prediction(&prediction(Market::Primary, Trend::Bearish, RiskLevel::High));

        assert_eq!(analysis.headline, "Bearish Trend");
        assert_eq!(analysis.description, "Downward pressure anticipated");
        assert_eq!(analysis.display.current_price, "$100.00");
        assert_eq!(analysis.risk_gauge, 80);
    }

    #[test]
    fn momentum_thresholds_are_exclusive() {
        assert_eq!(Momentum::from_volatility_percent(20.0), Momentum::Moderate);
        assert_eq!(Momentum::from_volatility_percent(20.1), Momentum::Strong);
        assert_eq!(Momentum::from_volatility_percent(10.0), Momentum::Weak);
    }

    #[test]
    fn percentages_carry_explicit_sign() {
        assert_eq!(signed_percent(4.567, 2), "+4.57%");
        assert_eq!(signed_percent(-3.21, 1), "-3.2%");
        assert_eq!(signed_percent(-0.0, 2), "+0.00%");
        assert_eq!(horizon_text(1), "1 year ahead");
    }
}
