use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{HistoricalSeries, Market, ProviderId, Quote, Symbol, ValidationError};

/// Default number of monthly closes requested for a projection.
pub const DEFAULT_HISTORY_MONTHS: usize = 24;

/// Upper bound on the history window a caller may request.
pub const MAX_HISTORY_MONTHS: usize = 240;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error surfaced to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Request payload for the latest quote of one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: Symbol,
}

impl QuoteRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Request payload for monthly closing prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub months: usize,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, months: usize) -> Result<Self, ValidationError> {
        if months == 0 || months > MAX_HISTORY_MONTHS {
            return Err(ValidationError::InvalidHistoryWindow {
                value: months,
                max: MAX_HISTORY_MONTHS,
            });
        }
        Ok(Self { symbol, months })
    }

    pub fn with_default_window(symbol: Symbol) -> Self {
        Self {
            symbol,
            months: DEFAULT_HISTORY_MONTHS,
        }
    }
}

/// Boxed future returned by [`DataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Market data contract consumed by the prediction service.
///
/// Implementations return series that are already chronological and free of
/// non-positive or non-finite closes.
pub trait DataSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn market(&self) -> Market;

    /// Whether `symbol` can be served at all. Sources backed by an open
    /// upstream accept anything and let the upstream reject unknown tickers.
    fn lists(&self, symbol: &Symbol) -> bool {
        let _ = symbol;
        true
    }

    fn company_name(&self, symbol: &Symbol) -> Option<String> {
        let _ = symbol;
        None
    }

    fn quote<'a>(&'a self, req: QuoteRequest) -> SourceFuture<'a, Quote>;

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, HistoricalSeries>;
}
