use pricecast_core::{HistoricalSeries, Market};
use serde::Serialize;

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{failure_to_envelope_error, CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    symbol: String,
    market: Market,
    months: usize,
    closes: HistoricalSeries,
}

pub async fn run(args: &HistoryArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let market = Market::from(args.market);
    let source_chain = context.source_chain(market);

    let (closes, error) = match context
        .predictor
        .history(&args.symbol, market, args.months)
        .await
    {
        Ok(closes) => (closes, None),
        Err(error) => (
            HistoricalSeries::default(),
            Some(failure_to_envelope_error(error)?),
        ),
    };

    let mut warnings = Vec::new();
    if let Some(requested) = args.months {
        if error.is_none() && closes.len() < requested {
            warnings.push(format!(
                "requested {requested} months, source returned {}",
                closes.len()
            ));
        }
    }
    warnings.extend(context.demo_key_warning(market));

    let data = serde_json::to_value(HistoryResponseData {
        symbol: args.symbol.trim().to_ascii_uppercase(),
        market,
        months: closes.len(),
        closes,
    })?;

    let mut result = CommandResult::ok(data, source_chain);
    result.warnings = warnings;
    if let Some(error) = error {
        result = result.with_error(error);
    }
    Ok(result)
}
