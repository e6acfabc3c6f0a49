//! End-to-end prediction journeys through `Predictor`, with canned Alpha
//! Vantage responses and a seeded simulated exchange.

use std::sync::Arc;

use pricecast_tests::*;

const CURRENT_YEAR: i32 = 2026;

fn us_client(closes: &[f64]) -> Arc<CannedHttpClient> {
    Arc::new(
        CannedHttpClient::new()
            .respond("GLOBAL_QUOTE", global_quote_json("AAPL", 100.0, 1.0, 1.0))
            .respond("TIME_SERIES_MONTHLY", monthly_series_json(closes)),
    )
}

// =============================================================================
// US market
// =============================================================================

#[tokio::test]
async fn user_predicts_a_us_stock_one_year_ahead() {
    // Given: AAPL at $100 with a history that stepped from 10 to 12
    let client = us_client(&step_closes());
    let predictor = predictor(client.clone(), 1);

    // When: the user asks for next year's price
    let request = PredictionRequest::new("aapl", Market::Primary, CURRENT_YEAR + 1);
    let prediction = predictor
        .predict(&request, CURRENT_YEAR)
        .await
        .expect("prediction succeeds");

    // Then: 20% growth is projected with confidence reduced by volatility
    assert_eq!(prediction.symbol.as_str(), "AAPL");
    assert_eq!(prediction.source, ProviderId::Alphavantage);
    assert_eq!(prediction.market, Market::Primary);
    assert_eq!(prediction.company_name, None);
    assert_eq!(prediction.history_len, 12);
    assert!((prediction.projection.price - 120.0).abs() < 1e-9);
    assert!((prediction.projection.change_percent - 20.0).abs() < 1e-9);
    assert_eq!(prediction.projection.trend, Trend::Bullish);
    assert_eq!(prediction.projection.confidence, 74);
    assert_eq!(prediction.projection.risk_level, RiskLevel::Low);

    // And: one quote and one history call reached the upstream
    let functions = client
        .recorded()
        .iter()
        .filter_map(|request| request.query_value("function").map(str::to_owned))
        .collect::<Vec<_>>();
    assert_eq!(functions, vec!["GLOBAL_QUOTE", "TIME_SERIES_MONTHLY"]);
}

#[tokio::test]
async fn distant_targets_rely_on_long_term_growth_and_lose_confidence() {
    // Given: the same history, ten years out
    let predictor = predictor(us_client(&step_closes()), 1);
    let request = PredictionRequest::new("AAPL", Market::Primary, CURRENT_YEAR + 10);

    // When: predicting
    let prediction = predictor
        .predict(&request, CURRENT_YEAR)
        .await
        .expect("prediction succeeds");

    // Then: growth is fully long-term and damped by 0.95^9
    let expected = 100.0 * (1.0 + 0.2 * 0.95f64.powi(9)).powi(10);
    assert!((prediction.projection.price - expected).abs() < 1e-6);
    assert_eq!(prediction.projection.years_ahead, 10);
    assert_eq!(prediction.projection.confidence, 44);
}

#[tokio::test]
async fn short_us_history_still_produces_a_projection() {
    // Given: only eight months of history
    let closes = [50.0, 51.0, 52.0, 53.0, 54.0, 55.0, 56.0, 57.0];
    let predictor = predictor(us_client(&closes), 1);

    // When: predicting two years ahead
    let prediction = predictor
        .predict(
            &PredictionRequest::new("AAPL", Market::Primary, CURRENT_YEAR + 2),
            CURRENT_YEAR,
        )
        .await
        .expect("prediction succeeds");

    // Then: long-term growth is zero but recent growth still counts
    assert_eq!(prediction.history_len, 8);
    assert_eq!(prediction.metrics.average_growth, 0.0);
    assert!(prediction.metrics.recent_growth > 0.0);
    assert!(prediction.projection.price > 100.0);
}

// =============================================================================
// Nigerian market
// =============================================================================

#[tokio::test]
async fn user_predicts_an_ngx_stock_reproducibly() {
    // Given: two predictors with the same simulation seed
    let request = PredictionRequest::new("dangcem", Market::Secondary, CURRENT_YEAR + 4)
        .with_history_months(36);

    // When: both run the same prediction
    let first = predictor(Arc::new(CannedHttpClient::new()), 77)
        .predict(&request, CURRENT_YEAR)
        .await
        .expect("prediction succeeds");
    let second = predictor(Arc::new(CannedHttpClient::new()), 77)
        .predict(&request, CURRENT_YEAR)
        .await
        .expect("prediction succeeds");

    // Then: the simulated data and projection match exactly
    assert_eq!(first.source, ProviderId::Simulated);
    assert_eq!(first.company_name.as_deref(), Some("Dangote Cement"));
    assert_eq!(first.quote.price, 280.5);
    assert_eq!(first.quote.currency, "NGN");
    assert_eq!(first.history_len, 36);
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.projection, second.projection);
    assert!((40..=100).contains(&first.projection.confidence));
}

#[tokio::test]
async fn prediction_serializes_for_the_envelope() {
    let prediction = predictor(Arc::new(CannedHttpClient::new()), 3)
        .predict(
            &PredictionRequest::new("GTCO", Market::Secondary, CURRENT_YEAR + 1),
            CURRENT_YEAR,
        )
        .await
        .expect("prediction succeeds");

    let json = serde_json::to_value(&prediction).expect("serializes");
    assert_eq!(json["symbol"], "GTCO");
    assert_eq!(json["market"], "ngx");
    assert_eq!(json["source"], "simulated");
    assert_eq!(json["target_year"], CURRENT_YEAR + 1);
    assert!(json["projection"]["trend"].is_string());
    assert!(json["metrics"]["volatility"].is_number());
}

// =============================================================================
// Failure journeys
// =============================================================================

#[tokio::test]
async fn target_year_in_the_past_is_rejected_before_any_fetch() {
    let client = us_client(&step_closes());
    let error = predictor(client.clone(), 1)
        .predict(
            &PredictionRequest::new("AAPL", Market::Primary, CURRENT_YEAR - 1),
            CURRENT_YEAR,
        )
        .await
        .expect_err("past year");

    assert!(matches!(error, PredictError::InvalidTargetYear { .. }));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn us_ticker_is_not_listed_on_the_ngx() {
    let error = predictor(Arc::new(CannedHttpClient::new()), 1)
        .predict(
            &PredictionRequest::new("AAPL", Market::Secondary, CURRENT_YEAR + 1),
            CURRENT_YEAR,
        )
        .await
        .expect_err("unlisted");

    assert_eq!(error.code(), "prediction.unlisted_symbol");
    assert_eq!(
        error.to_string(),
        "symbol AAPL is not listed on the Nigerian Market"
    );
}

#[tokio::test]
async fn throttled_upstream_surfaces_a_retryable_source_error() {
    let client = Arc::new(
        CannedHttpClient::new()
            .respond("GLOBAL_QUOTE", global_quote_json("AAPL", 100.0, 0.0, 0.0))
            .respond(
                "TIME_SERIES_MONTHLY",
                r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
            ),
    );

    let error = predictor(client, 1)
        .predict(
            &PredictionRequest::new("AAPL", Market::Primary, CURRENT_YEAR + 3),
            CURRENT_YEAR,
        )
        .await
        .expect_err("throttled");

    assert_eq!(error.code(), "source.rate_limited");
    assert_eq!(error.provider(), Some(ProviderId::Alphavantage));
    assert!(error.retryable());
}

#[tokio::test]
async fn empty_upstream_history_is_unavailable() {
    let client = Arc::new(
        CannedHttpClient::new()
            .respond("GLOBAL_QUOTE", global_quote_json("AAPL", 100.0, 0.0, 0.0))
            .respond("TIME_SERIES_MONTHLY", r#"{"Monthly Time Series": {}}"#),
    );

    let error = predictor(client, 1)
        .predict(
            &PredictionRequest::new("AAPL", Market::Primary, CURRENT_YEAR + 1),
            CURRENT_YEAR,
        )
        .await
        .expect_err("no history");

    assert_eq!(error.code(), "source.unavailable");
}
