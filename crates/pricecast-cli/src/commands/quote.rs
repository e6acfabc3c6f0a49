use pricecast_core::{Market, Quote};
use serde::Serialize;

use crate::cli::QuoteArgs;
use crate::error::CliError;

use super::{failure_to_envelope_error, CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    market: Market,
    quote: Option<Quote>,
}

pub async fn run(args: &QuoteArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let market = Market::from(args.market);
    let source_chain = context.source_chain(market);

    let mut result = match context.predictor.quote(&args.symbol, market).await {
        Ok(quote) => CommandResult::ok(
            serde_json::to_value(QuoteResponseData {
                market,
                quote: Some(quote),
            })?,
            source_chain,
        ),
        Err(error) => {
            let envelope_error = failure_to_envelope_error(error)?;
            CommandResult::ok(
                serde_json::to_value(QuoteResponseData {
                    market,
                    quote: None,
                })?,
                source_chain,
            )
            .with_error(envelope_error)
        }
    };
    if let Some(warning) = context.demo_key_warning(market) {
        result = result.with_warning(warning);
    }
    Ok(result)
}
