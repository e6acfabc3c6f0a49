//! # Pricecast Core
//!
//! Domain types, data sources and the price-projection estimator behind the
//! `pricecast` CLI.
//!
//! ## Overview
//!
//! - **Canonical domain models** for quotes, historical series and projections
//! - **Estimator** turning a current price and monthly closes into a projection
//! - **Data source trait** with Alpha Vantage and simulated-exchange adapters
//! - **Prediction service** routing each market to its source
//! - **Response envelope** with metadata and structured errors
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage (US) and simulated NGX sources |
//! | [`config`] | Environment-driven configuration |
//! | [`data_source`] | Data source trait and request types |
//! | [`domain`] | Domain models (Quote, HistoricalSeries, Projection, Market) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`estimator`] | Growth metrics and projection |
//! | [`http_client`] | HTTP client abstraction |
//! | [`predictor`] | End-to-end prediction service |
//! | [`provider_policy`] | Per-provider quota and backoff policy |
//! | [`source`] | Provider identifiers |
//! | [`throttling`] | Request budget backed by governor |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricecast_core::{Market, PredictionRequest, Predictor, PricecastConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let predictor = Predictor::from_config(&PricecastConfig::from_env()?);
//!     let request = PredictionRequest::new("DANGCEM", Market::Secondary, 2030);
//!     let prediction = predictor.predict_now(&request).await?;
//!
//!     println!(
//!         "{} in {}: {:.2} ({}% confidence)",
//!         prediction.symbol,
//!         prediction.target_year,
//!         prediction.projection.price,
//!         prediction.projection.confidence
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Predictor      │────▶│ Estimator (pure) │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Source     │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ + RequestBudget  │
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod estimator;
pub mod http_client;
pub mod predictor;
pub mod provider_policy;
pub mod source;
pub mod throttling;

pub use adapters::{AlphaVantageAdapter, ListedCompany, SimulatedExchange, NGX_CATALOG};
pub use config::PricecastConfig;
pub use data_source::{
    DataSource, HistoryRequest, QuoteRequest, SourceError, SourceErrorKind, SourceFuture,
    DEFAULT_HISTORY_MONTHS, MAX_HISTORY_MONTHS,
};
pub use domain::*;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::ValidationError;
pub use estimator::{estimate_growth_metrics, project, EstimateError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use predictor::{PredictError, Prediction, PredictionRequest, Predictor};
pub use provider_policy::{BackoffPolicy, ProviderPolicy};
pub use source::ProviderId;
pub use throttling::RequestBudget;
