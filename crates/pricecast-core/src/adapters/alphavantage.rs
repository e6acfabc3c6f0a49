use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PricecastConfig;
use crate::data_source::{DataSource, HistoryRequest, QuoteRequest, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::provider_policy::ProviderPolicy;
use crate::throttling::RequestBudget;
use crate::{HistoricalSeries, Market, PricePoint, ProviderId, Quote, Symbol, UtcDateTime};

const GLOBAL_QUOTE: &str = "GLOBAL_QUOTE";
const TIME_SERIES_MONTHLY: &str = "TIME_SERIES_MONTHLY";

/// Alpha Vantage adapter for the primary (US) market.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
    budget: RequestBudget,
}

impl AlphaVantageAdapter {
    /// Adapter that talks to the real API through reqwest.
    pub fn from_config(config: &PricecastConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &PricecastConfig) -> Self {
        Self {
            http_client,
            api_key: config.alphavantage_api_key.clone(),
            base_url: config.alphavantage_base_url.clone(),
            timeout_ms: config.http_timeout_ms,
            budget: RequestBudget::from_policy(&ProviderPolicy::alphavantage_default()),
        }
    }

    /// Replaces the request budget, e.g. to share one quota between handles.
    pub fn with_budget(mut self, budget: RequestBudget) -> Self {
        self.budget = budget;
        self
    }

    async fn fetch(&self, function: &'static str, symbol: &Symbol) -> Result<Value, SourceError> {
        if let Err(delay) = self.budget.try_acquire() {
            warn!(function, %symbol, retry_in_s = delay.as_secs_f64(), "alphavantage budget exhausted");
            return Err(SourceError::rate_limited(format!(
                "alphavantage free-tier limit exceeded; retry in {:.2}s",
                delay.as_secs_f64()
            )));
        }

        debug!(function, %symbol, "requesting alphavantage");
        let request = HttpRequest::get(&self.base_url)
            .with_query("function", function)
            .with_query("symbol", symbol.as_str())
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(function, %symbol, error = error.message(), "alphavantage transport failure");
            if error.retryable() {
                SourceError::unavailable(format!(
                    "alphavantage transport error: {}",
                    error.message()
                ))
            } else {
                SourceError::internal(format!("alphavantage transport error: {}", error.message()))
            }
        })?;

        if !response.is_success() {
            warn!(function, %symbol, status = response.status, "alphavantage returned an error status");
            return Err(SourceError::unavailable(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|error| {
            SourceError::internal(format!("failed to parse alphavantage response: {error}"))
        })?;
        check_upstream_notice(&body)?;
        Ok(body)
    }

    async fn fetch_quote(&self, req: &QuoteRequest) -> Result<Quote, SourceError> {
        let body = self.fetch(GLOBAL_QUOTE, &req.symbol).await?;
        let response: GlobalQuoteResponse = serde_json::from_value(body).map_err(|error| {
            SourceError::internal(format!("unexpected alphavantage quote shape: {error}"))
        })?;

        let Some(price) = response.quote.price.as_deref() else {
            return Err(SourceError::unavailable(format!(
                "no quote data available for {}",
                req.symbol
            )));
        };

        let point = PricePoint::new(
            parse_number("05. price", price)?,
            response
                .quote
                .change
                .as_deref()
                .map(|raw| parse_number("09. change", raw))
                .transpose()?
                .unwrap_or(0.0),
            response
                .quote
                .change_percent
                .as_deref()
                .map(|raw| parse_number("10. change percent", raw.trim_end_matches('%')))
                .transpose()?
                .unwrap_or(0.0),
        )?;

        let symbol = match response.quote.symbol.as_deref() {
            Some(raw) => Symbol::parse(raw)?,
            None => req.symbol.clone(),
        };

        Ok(Quote::new(symbol, point, Market::Primary.currency(), UtcDateTime::now())?)
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<HistoricalSeries, SourceError> {
        let body = self.fetch(TIME_SERIES_MONTHLY, &req.symbol).await?;
        let response: MonthlySeriesResponse = serde_json::from_value(body).map_err(|error| {
            SourceError::internal(format!("unexpected alphavantage series shape: {error}"))
        })?;

        let Some(months) = response.series.filter(|series| !series.is_empty()) else {
            return Err(SourceError::unavailable(format!(
                "no historical data available for {}",
                req.symbol
            )));
        };

        Ok(last_closes(months, req.months))
    }
}

impl DataSource for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn market(&self) -> Market {
        Market::Primary
    }

    fn quote<'a>(&'a self, req: QuoteRequest) -> SourceFuture<'a, Quote> {
        Box::pin(async move { self.fetch_quote(&req).await })
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, HistoricalSeries> {
        Box::pin(async move { self.fetch_history(&req).await })
    }
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: GlobalQuote,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol", default)]
    symbol: Option<String>,
    #[serde(rename = "05. price", default)]
    price: Option<String>,
    #[serde(rename = "09. change", default)]
    change: Option<String>,
    #[serde(rename = "10. change percent", default)]
    change_percent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MonthlySeriesResponse {
    #[serde(rename = "Monthly Time Series", default)]
    series: Option<BTreeMap<String, MonthlyBar>>,
}

#[derive(Debug, Deserialize)]
struct MonthlyBar {
    #[serde(rename = "4. close")]
    close: String,
}

/// Keys are ISO dates, so map order is chronological.
fn last_closes(months: BTreeMap<String, MonthlyBar>, window: usize) -> HistoricalSeries {
    let skip = months.len().saturating_sub(window);
    HistoricalSeries::sanitized(
        months
            .into_values()
            .skip(skip)
            .filter_map(|bar| bar.close.trim().parse::<f64>().ok()),
    )
}

/// Alpha Vantage reports bad symbols and throttling as 200 responses.
fn check_upstream_notice(body: &Value) -> Result<(), SourceError> {
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(SourceError::invalid_request(format!(
            "alphavantage rejected the request: {message}"
        )));
    }

    if let Some(message) = body
        .get("Note")
        .or_else(|| body.get("Information"))
        .and_then(Value::as_str)
    {
        return Err(SourceError::rate_limited(format!(
            "alphavantage request limit reached: {message}"
        )));
    }

    Ok(())
}

fn parse_number(field: &str, raw: &str) -> Result<f64, SourceError> {
    raw.trim().parse::<f64>().map_err(|_| {
        SourceError::internal(format!("alphavantage field '{field}' is not a number: '{raw}'"))
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::provider_policy::BackoffPolicy;

    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn json(body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(HttpResponse::ok_json(body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("not poisoned").clone()
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests.lock().expect("not poisoned").push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn adapter(client: Arc<CannedHttpClient>) -> AlphaVantageAdapter {
        let config = PricecastConfig {
            alphavantage_api_key: String::from("test-key"),
            ..PricecastConfig::default()
        };
        AlphaVantageAdapter::with_http_client(client, &config)
    }

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    #[tokio::test]
    async fn parses_global_quote_strings() {
        let client = CannedHttpClient::json(
            r#"{"Global Quote": {"01. symbol": "IBM", "05. price": "231.4500",
                "09. change": "-1.2000", "10. change percent": "-0.5158%"}}"#,
        );
        let quote = adapter(client.clone())
            .quote(QuoteRequest::new(symbol("ibm")))
            .await
            .expect("quote parses");

        assert_eq!(quote.symbol.as_str(), "IBM");
        assert_eq!(quote.price, 231.45);
        assert_eq!(quote.change, -1.2);
        assert_eq!(quote.change_percent, -0.5158);
        assert_eq!(quote.currency, "USD");

        let requests = client.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_value("function"), Some("GLOBAL_QUOTE"));
        assert_eq!(requests[0].query_value("symbol"), Some("IBM"));
        assert_eq!(requests[0].query_value("apikey"), Some("test-key"));
    }

    #[tokio::test]
    async fn empty_global_quote_is_unavailable() {
        let client = CannedHttpClient::json(r#"{"Global Quote": {}}"#);
        let err = adapter(client)
            .quote(QuoteRequest::new(symbol("NOPE")))
            .await
            .expect_err("no price");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn monthly_series_keeps_latest_window_oldest_first() {
        let client = CannedHttpClient::json(
            r#"{"Meta Data": {}, "Monthly Time Series": {
                "2024-03-28": {"4. close": "30.0"},
                "2024-01-31": {"4. close": "10.0"},
                "2024-02-29": {"4. close": "20.0"},
                "2024-04-30": {"4. close": "n/a"},
                "2024-05-31": {"4. close": "50.0"}
            }}"#,
        );
        let request = HistoryRequest::new(symbol("IBM"), 4).expect("valid window");
        let series = adapter(client.clone())
            .history(request)
            .await
            .expect("series parses");

        assert_eq!(series.as_slice(), &[20.0, 30.0, 50.0]);
        assert_eq!(
            client.recorded()[0].query_value("function"),
            Some("TIME_SERIES_MONTHLY")
        );
    }

    #[tokio::test]
    async fn upstream_notices_are_classified() {
        let invalid = CannedHttpClient::json(r#"{"Error Message": "Invalid API call."}"#);
        let err = adapter(invalid)
            .quote(QuoteRequest::new(symbol("ZZZZ")))
            .await
            .expect_err("rejected");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);

        let throttled = CannedHttpClient::json(r#"{"Note": "Thank you for using Alpha Vantage!"}"#);
        let err = adapter(throttled)
            .history(HistoryRequest::with_default_window(symbol("IBM")))
            .await
            .expect_err("throttled");
        assert_eq!(err.kind(), SourceErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn error_status_and_transport_failures_are_unavailable() {
        let client = Arc::new(CannedHttpClient {
            response: Ok(HttpResponse {
                status: 503,
                body: String::new(),
            }),
            requests: Mutex::new(Vec::new()),
        });
        let err = adapter(client)
            .quote(QuoteRequest::new(symbol("IBM")))
            .await
            .expect_err("503");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);

        let client = Arc::new(CannedHttpClient {
            response: Err(HttpError::non_retryable("bad url")),
            requests: Mutex::new(Vec::new()),
        });
        let err = adapter(client)
            .quote(QuoteRequest::new(symbol("IBM")))
            .await
            .expect_err("transport");
        assert_eq!(err.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn exhausted_budget_short_circuits_before_transport() {
        let client = CannedHttpClient::json(r#"{"Global Quote": {"05. price": "1.0"}}"#);
        let budget = RequestBudget::new(
            Duration::from_secs(60),
            1,
            BackoffPolicy {
                initial_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(8),
                multiplier: 2.0,
                max_retries: 3,
            },
        );
        let adapter = adapter(client.clone()).with_budget(budget);

        assert!(adapter.quote(QuoteRequest::new(symbol("IBM"))).await.is_ok());
        let err = adapter
            .quote(QuoteRequest::new(symbol("IBM")))
            .await
            .expect_err("second call exceeds quota");

        assert_eq!(err.kind(), SourceErrorKind::RateLimited);
        assert_eq!(client.recorded().len(), 1);
    }
}
