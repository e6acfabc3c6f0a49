use pricecast_core::{ListedCompany, Market, ProviderId, SimulatedExchange};
use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct MarketProfile {
    id: Market,
    label: &'static str,
    currency: &'static str,
    source: ProviderId,
    growth_multiplier: f64,
    base_confidence: f64,
}

#[derive(Debug, Serialize)]
struct MarketsResponseData {
    markets: Vec<MarketProfile>,
    ngx_catalog: &'static [ListedCompany],
}

pub fn run() -> Result<CommandResult, CliError> {
    let markets = Market::ALL
        .into_iter()
        .map(|market| MarketProfile {
            id: market,
            label: market.label(),
            currency: market.currency(),
            source: ProviderId::default_for(market),
            growth_multiplier: market.growth_multiplier(),
            base_confidence: market.base_confidence(),
        })
        .collect();

    let data = serde_json::to_value(MarketsResponseData {
        markets,
        ngx_catalog: SimulatedExchange::catalog(),
    })?;
    Ok(CommandResult::ok(data, ProviderId::ALL.to_vec()))
}
