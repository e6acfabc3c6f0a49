use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::data_source::{DataSource, HistoryRequest, QuoteRequest, SourceError, SourceFuture};
use crate::{HistoricalSeries, Market, PricePoint, ProviderId, Quote, Symbol, UtcDateTime};

/// Reference price for symbols missing from the catalog.
///
/// Only reached when the exchange is queried directly: `Predictor` checks
/// [`DataSource::lists`] first and rejects unlisted symbols.
pub const FALLBACK_REFERENCE_PRICE: f64 = 50.0;

/// A company listed on the simulated exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ListedCompany {
    pub symbol: &'static str,
    pub name: &'static str,
    pub reference_price: f64,
}

const fn listed(symbol: &'static str, name: &'static str, reference_price: f64) -> ListedCompany {
    ListedCompany {
        symbol,
        name,
        reference_price,
    }
}

/// Nigerian Exchange symbols served by [`SimulatedExchange`].
pub const NGX_CATALOG: [ListedCompany; 15] = [
    listed("DANGCEM", "Dangote Cement", 280.50),
    listed("GTCO", "Guaranty Trust Holding Company", 32.15),
    listed("ZENITHBANK", "Zenith Bank", 28.90),
    listed("BUACEMENT", "BUA Cement", 95.20),
    listed("MTNN", "MTN Nigeria", 185.75),
    listed("AIRTELAFRI", "Airtel Africa", 1420.00),
    listed("BUAFOODS", "BUA Foods", 78.30),
    listed("SEPLAT", "Seplat Petroleum", 1250.00),
    listed("FBNH", "FBN Holdings", 14.85),
    listed("ACCESS", "Access Holdings", 12.40),
    listed("UBA", "United Bank for Africa", 18.65),
    listed("OANDO", "Oando", 8.75),
    listed("STERLNBANK", "Sterling Bank", 2.95),
    listed("FCMB", "First City Monument Bank", 4.20),
    listed("WAPCO", "Lafarge Africa", 28.50),
];

// Daily move is uniform in [-5%, +5%).
const QUOTE_CHANGE_SPAN_PERCENT: f64 = 10.0;
// History starts 20% below the reference price.
const HISTORY_START_RATIO: f64 = 0.8;
// Monthly change is (u - 0.45) * 0.15, a slight upward drift.
const MONTHLY_DRIFT_CENTER: f64 = 0.45;
const MONTHLY_CHANGE_SPAN: f64 = 0.15;

/// Secondary-market source backed by random data.
///
/// Seeded instances are reproducible, which keeps prediction tests
/// deterministic.
#[derive(Debug)]
pub struct SimulatedExchange {
    rng: Mutex<fastrand::Rng>,
}

impl SimulatedExchange {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    pub fn catalog() -> &'static [ListedCompany] {
        &NGX_CATALOG
    }

    pub fn lookup(symbol: &Symbol) -> Option<&'static ListedCompany> {
        NGX_CATALOG
            .iter()
            .find(|company| company.symbol == symbol.as_str())
    }

    pub fn reference_price(symbol: &Symbol) -> f64 {
        Self::lookup(symbol).map_or(FALLBACK_REFERENCE_PRICE, |company| company.reference_price)
    }

    fn simulate_quote(&self, symbol: &Symbol) -> Result<Quote, SourceError> {
        let price = Self::reference_price(symbol);
        let change_percent = (self.next_unit() - 0.5) * QUOTE_CHANGE_SPAN_PERCENT;
        let change = price * change_percent / 100.0;

        let point = PricePoint::new(price, change, change_percent)?;
        Ok(Quote::new(
            symbol.clone(),
            point,
            Market::Secondary.currency(),
            UtcDateTime::now(),
        )?)
    }

    fn simulate_history(&self, req: &HistoryRequest) -> HistoricalSeries {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut price = Self::reference_price(&req.symbol) * HISTORY_START_RATIO;

        HistoricalSeries::sanitized((0..req.months).map(|_| {
            let monthly_change = (rng.f64() - MONTHLY_DRIFT_CENTER) * MONTHLY_CHANGE_SPAN;
            price *= 1.0 + monthly_change;
            price
        }))
    }

    fn next_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .f64()
    }
}

impl Default for SimulatedExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for SimulatedExchange {
    fn id(&self) -> ProviderId {
        ProviderId::Simulated
    }

    fn market(&self) -> Market {
        Market::Secondary
    }

    fn lists(&self, symbol: &Symbol) -> bool {
        Self::lookup(symbol).is_some()
    }

    fn company_name(&self, symbol: &Symbol) -> Option<String> {
        Self::lookup(symbol).map(|company| company.name.to_owned())
    }

    fn quote<'a>(&'a self, req: QuoteRequest) -> SourceFuture<'a, Quote> {
        debug!(symbol = %req.symbol, "simulating quote");
        let quote = self.simulate_quote(&req.symbol);
        Box::pin(async move { quote })
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, HistoricalSeries> {
        debug!(symbol = %req.symbol, months = req.months, "simulating history");
        let series = self.simulate_history(&req);
        Box::pin(async move { Ok(series) })
    }
}
