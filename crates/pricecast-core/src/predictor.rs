//! Prediction service: resolves the data source for a market, fetches the
//! quote and history, and runs the estimator.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::{AlphaVantageAdapter, SimulatedExchange};
use crate::config::PricecastConfig;
use crate::data_source::{DataSource, HistoryRequest, QuoteRequest, SourceError};
use crate::estimator::{estimate_growth_metrics, project, EstimateError};
use crate::{
    GrowthMetrics, HistoricalSeries, Market, Projection, ProviderId, Quote, Symbol, UtcDateTime,
    ValidationError,
};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("target year {target_year} must be after the current year {current_year}")]
    InvalidTargetYear { target_year: i32, current_year: i32 },

    #[error("symbol {symbol} is not listed on the {}", .market.label())]
    UnlistedSymbol { symbol: Symbol, market: Market },

    #[error("{provider} failed: {error}")]
    Source {
        provider: ProviderId,
        #[source]
        error: SourceError,
    },

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

impl PredictError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation.invalid_input",
            Self::InvalidTargetYear { .. } => "prediction.invalid_target_year",
            Self::UnlistedSymbol { .. } => "prediction.unlisted_symbol",
            Self::Source { error, .. } => error.code(),
            Self::Estimate(_) => "estimate.invalid_argument",
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(self, Self::Source { error, .. } if error.retryable())
    }

    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            Self::Source { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

/// User input for one prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub symbol: String,
    pub market: Market,
    pub target_year: i32,
    pub history_months: Option<usize>,
}

impl PredictionRequest {
    pub fn new(symbol: impl Into<String>, market: Market, target_year: i32) -> Self {
        Self {
            symbol: symbol.into(),
            market,
            target_year,
            history_months: None,
        }
    }

    pub fn with_history_months(mut self, months: usize) -> Self {
        self.history_months = Some(months);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub symbol: Symbol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub market: Market,
    pub source: ProviderId,
    pub quote: Quote,
    pub history_len: usize,
    pub target_year: i32,
    pub metrics: GrowthMetrics,
    pub projection: Projection,
}

/// Routes each market to its data source.
#[derive(Clone)]
pub struct Predictor {
    primary: Arc<dyn DataSource>,
    secondary: Arc<dyn DataSource>,
    history_months: usize,
}

impl Predictor {
    pub fn new(primary: Arc<dyn DataSource>, secondary: Arc<dyn DataSource>) -> Self {
        Self {
            primary,
            secondary,
            history_months: crate::data_source::DEFAULT_HISTORY_MONTHS,
        }
    }

    /// Alpha Vantage for the primary market, the simulated exchange for the
    /// secondary one.
    pub fn from_config(config: &PricecastConfig) -> Self {
        let secondary = match config.simulation_seed {
            Some(seed) => SimulatedExchange::with_seed(seed),
            None => SimulatedExchange::new(),
        };
        Self::new(
            Arc::new(AlphaVantageAdapter::from_config(config)),
            Arc::new(secondary),
        )
        .with_history_months(config.history_months)
    }

    pub fn with_history_months(mut self, months: usize) -> Self {
        self.history_months = months;
        self
    }

    pub fn source_for(&self, market: Market) -> &dyn DataSource {
        match market {
            Market::Primary => self.primary.as_ref(),
            Market::Secondary => self.secondary.as_ref(),
        }
    }

    /// Validates `raw` and checks that the market's source serves it.
    pub fn resolve_symbol(&self, raw: &str, market: Market) -> Result<Symbol, PredictError> {
        let symbol = Symbol::parse(raw)?;
        if !self.source_for(market).lists(&symbol) {
            return Err(PredictError::UnlistedSymbol { symbol, market });
        }
        Ok(symbol)
    }

    pub async fn quote(&self, raw: &str, market: Market) -> Result<Quote, PredictError> {
        let symbol = self.resolve_symbol(raw, market)?;
        let source = self.source_for(market);
        source
            .quote(QuoteRequest::new(symbol))
            .await
            .map_err(|error| source_error(source, error))
    }

    pub async fn history(
        &self,
        raw: &str,
        market: Market,
        months: Option<usize>,
    ) -> Result<HistoricalSeries, PredictError> {
        let symbol = self.resolve_symbol(raw, market)?;
        let request = HistoryRequest::new(symbol, months.unwrap_or(self.history_months))?;
        let source = self.source_for(market);
        source
            .history(request)
            .await
            .map_err(|error| source_error(source, error))
    }

    /// Runs a prediction using the current UTC year.
    pub async fn predict_now(&self, req: &PredictionRequest) -> Result<Prediction, PredictError> {
        self.predict(req, UtcDateTime::now().year()).await
    }

    pub async fn predict(
        &self,
        req: &PredictionRequest,
        current_year: i32,
    ) -> Result<Prediction, PredictError> {
        let symbol = self.resolve_symbol(&req.symbol, req.market)?;
        if req.target_year <= current_year {
            return Err(PredictError::InvalidTargetYear {
                target_year: req.target_year,
                current_year,
            });
        }
        // target_year > current_year, so the difference is positive.
        let years_ahead = req.target_year.abs_diff(current_year);
        let months = req.history_months.unwrap_or(self.history_months);
        let history_request = HistoryRequest::new(symbol.clone(), months)?;

        let source = self.source_for(req.market);
        debug!(%symbol, market = %req.market, provider = %source.id(), years_ahead, "fetching market data");

        let quote = source
            .quote(QuoteRequest::new(symbol.clone()))
            .await
            .map_err(|error| source_error(source, error))?;
        let history = source
            .history(history_request)
            .await
            .map_err(|error| source_error(source, error))?;
        if history.len() < 12 {
            debug!(%symbol, closes = history.len(), "short history, long-term growth is zero");
        }

        let metrics = estimate_growth_metrics(&history);
        let projection = project(&quote.point(), &history, years_ahead, req.market)?;
        info!(
            %symbol,
            target_year = req.target_year,
            projected = projection.price,
            confidence = projection.confidence,
            "prediction complete"
        );

        Ok(Prediction {
            company_name: source.company_name(&symbol),
            symbol,
            market: req.market,
            source: source.id(),
            quote,
            history_len: history.len(),
            target_year: req.target_year,
            metrics,
            projection,
        })
    }
}

fn source_error(source: &dyn DataSource, error: SourceError) -> PredictError {
    warn!(provider = %source.id(), code = error.code(), error = error.message(), "data source failed");
    PredictError::Source {
        provider: source.id(),
        error,
    }
}
