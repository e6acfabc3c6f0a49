mod history;
mod markets;
mod predict;
mod quote;

use std::time::Instant;

use pricecast_core::{
    config::DEFAULT_API_KEY, Envelope, EnvelopeError, Market, PredictError, PricecastConfig,
    Predictor, ProviderId,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Everything a command needs to talk to the data sources.
pub struct CommandContext {
    pub predictor: Predictor,
    pub demo_key: bool,
}

impl CommandContext {
    pub fn from_config(config: &PricecastConfig) -> Self {
        Self {
            predictor: Predictor::from_config(config),
            demo_key: config.alphavantage_api_key == DEFAULT_API_KEY,
        }
    }

    fn source_chain(&self, market: Market) -> Vec<ProviderId> {
        vec![self.predictor.source_for(market).id()]
    }

    fn demo_key_warning(&self, market: Market) -> Option<String> {
        (self.demo_key && market == Market::Primary).then(|| {
            String::from(
                "using the Alpha Vantage demo key; set PRICECAST_ALPHAVANTAGE_API_KEY or --api-key",
            )
        })
    }
}

/// Environment config with CLI flags applied on top.
pub fn resolve_config(cli: &Cli) -> Result<PricecastConfig, CliError> {
    let mut config = PricecastConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.http_timeout_ms = timeout_ms;
    }
    if let Some(seed) = cli.seed {
        config.simulation_seed = Some(seed);
    }
    if let Some(api_key) = &cli.api_key {
        config.alphavantage_api_key = api_key.clone();
    }
    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = resolve_config(cli)?;
    run_with(cli, &CommandContext::from_config(&config)).await
}

pub async fn run_with(cli: &Cli, context: &CommandContext) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Predict(args) => predict::run(args, context).await?,
        Command::Quote(args) => quote::run(args, context).await?,
        Command::History(args) => history::run(args, context).await?,
        Command::Markets => markets::run()?,
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let CommandResult {
        data,
        warnings,
        errors,
        source_chain,
    } = command_result;

    let mut metadata = Metadata::new(source_chain, latency_ms)?;
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Splits a failed lookup into input errors (exit 2) and upstream failures
/// reported inside the envelope.
fn failure_to_envelope_error(error: PredictError) -> Result<EnvelopeError, CliError> {
    match &error {
        PredictError::Validation(inner) => Err(CliError::Validation(inner.clone())),
        PredictError::InvalidTargetYear { .. } | PredictError::UnlistedSymbol { .. } => {
            Err(CliError::Command(error.to_string()))
        }
        PredictError::Source { .. } | PredictError::Estimate(_) => {
            let mut envelope_error = EnvelopeError::new(error.code(), error.to_string())?
                .with_retryable(error.retryable());
            if let Some(provider) = error.provider() {
                envelope_error = envelope_error.with_source(provider);
            }
            Ok(envelope_error)
        }
    }
}
