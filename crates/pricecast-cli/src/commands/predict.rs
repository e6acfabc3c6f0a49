use pricecast_core::{Market, Prediction, PredictionRequest};
use serde::Serialize;
use serde_json::Value;

use crate::analysis::Analysis;
use crate::cli::PredictArgs;
use crate::error::CliError;

use super::{failure_to_envelope_error, CommandContext, CommandResult};

// Windows the estimator needs for recent and long-term growth.
const RECENT_GROWTH_MIN_CLOSES: usize = 6;
const AVERAGE_GROWTH_MIN_CLOSES: usize = 12;

#[derive(Debug, Serialize)]
struct PredictResponseData {
    prediction: Prediction,
    analysis: Analysis,
}

pub async fn run(args: &PredictArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let market = Market::from(args.market);
    let source_chain = context.source_chain(market);

    let mut request = PredictionRequest::new(args.symbol.as_str(), market, args.year);
    if let Some(months) = args.months {
        request = request.with_history_months(months);
    }

    let mut result = match context.predictor.predict_now(&request).await {
        Ok(prediction) => {
            let warning = short_history_warning(prediction.history_len);
            let analysis = Analysis::from_prediction(&prediction);
            let data = serde_json::to_value(PredictResponseData {
                prediction,
                analysis,
            })?;
            let mut result = CommandResult::ok(data, source_chain);
            if let Some(warning) = warning {
                result = result.with_warning(warning);
            }
            result
        }
        Err(error) => CommandResult::ok(Value::Null, source_chain)
            .with_error(failure_to_envelope_error(error)?),
    };
    if let Some(warning) = context.demo_key_warning(market) {
        result = result.with_warning(warning);
    }
    Ok(result)
}

fn short_history_warning(closes: usize) -> Option<String> {
    if closes < RECENT_GROWTH_MIN_CLOSES {
        Some(format!(
            "only {closes} monthly closes available; projection assumes zero growth"
        ))
    } else if closes < AVERAGE_GROWTH_MIN_CLOSES {
        Some(format!(
            "only {closes} monthly closes available; long-term growth treated as zero"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use pricecast_core::UtcDateTime;

    use super::super::test_support::offline_context;
    use super::*;
    use crate::cli::MarketArg;

    fn args(symbol: &str, market: MarketArg, years_ahead: i32) -> PredictArgs {
        PredictArgs {
            symbol: String::from(symbol),
            year: UtcDateTime::now().year() + years_ahead,
            market,
            months: None,
        }
    }

    #[tokio::test]
    async fn payload_carries_prediction_and_analysis() {
        let result = run(&args("DANGCEM", MarketArg::Ngx, 3), &offline_context())
            .await
            .expect("prediction");

        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        let prediction = &result.data["prediction"];
        assert_eq!(prediction["symbol"], "DANGCEM");
        assert_eq!(prediction["company_name"], "Dangote Cement");
        assert_eq!(prediction["market"], "ngx");
        assert_eq!(prediction["projection"]["years_ahead"], 3);
        assert_eq!(result.data["analysis"]["horizon"], "3 years ahead");
        assert_eq!(result.data["analysis"]["display"]["current_price"], "₦280.50");
    }

    #[tokio::test]
    async fn source_failure_leaves_null_payload() {
        let result = run(&args("AAPL", MarketArg::Us, 1), &offline_context())
            .await
            .expect("envelope data");

        assert!(result.data.is_null());
        assert_eq!(result.errors[0].code, "source.unavailable");
    }

    #[test]
    fn warns_about_short_histories() {
        assert!(short_history_warning(24).is_none());
        assert!(short_history_warning(11)
            .is_some_and(|warning| warning.contains("long-term growth")));
        assert!(short_history_warning(3).is_some_and(|warning| warning.contains("zero growth")));
    }
}
