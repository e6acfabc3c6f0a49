//! Runtime configuration.
//!
//! Values resolve as defaults, then `PRICECAST_*` environment variables, then
//! whatever the caller overrides (the CLI applies its flags last).

use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use crate::data_source::{DEFAULT_HISTORY_MONTHS, MAX_HISTORY_MONTHS};
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ValidationError;

pub const ENV_API_KEY: &str = "PRICECAST_ALPHAVANTAGE_API_KEY";
pub const ENV_BASE_URL: &str = "PRICECAST_ALPHAVANTAGE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "PRICECAST_HTTP_TIMEOUT_MS";
pub const ENV_HISTORY_MONTHS: &str = "PRICECAST_HISTORY_MONTHS";
pub const ENV_SIMULATION_SEED: &str = "PRICECAST_SIMULATION_SEED";

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_API_KEY: &str = "demo";

#[derive(Clone, PartialEq, Eq)]
pub struct PricecastConfig {
    pub alphavantage_api_key: String,
    pub alphavantage_base_url: String,
    pub http_timeout_ms: u64,
    pub history_months: usize,
    pub simulation_seed: Option<u64>,
}

impl Default for PricecastConfig {
    fn default() -> Self {
        Self {
            alphavantage_api_key: String::from(DEFAULT_API_KEY),
            alphavantage_base_url: String::from(DEFAULT_BASE_URL),
            http_timeout_ms: DEFAULT_TIMEOUT_MS,
            history_months: DEFAULT_HISTORY_MONTHS,
            simulation_seed: None,
        }
    }
}

impl PricecastConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup; blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(api_key) = get(ENV_API_KEY) {
            config.alphavantage_api_key = api_key;
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            config.alphavantage_base_url = base_url;
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            config.http_timeout_ms = parse_setting(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = get(ENV_HISTORY_MONTHS) {
            config.history_months = parse_setting(ENV_HISTORY_MONTHS, &raw)?;
        }
        if let Some(raw) = get(ENV_SIMULATION_SEED) {
            config.simulation_seed = Some(parse_setting(ENV_SIMULATION_SEED, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.http_timeout_ms == 0 {
            return Err(ValidationError::InvalidConfig {
                key: ENV_TIMEOUT_MS,
                value: self.http_timeout_ms.to_string(),
            });
        }
        if self.history_months == 0 || self.history_months > MAX_HISTORY_MONTHS {
            return Err(ValidationError::InvalidHistoryWindow {
                value: self.history_months,
                max: MAX_HISTORY_MONTHS,
            });
        }
        if !self.alphavantage_base_url.starts_with("http://")
            && !self.alphavantage_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidConfig {
                key: ENV_BASE_URL,
                value: self.alphavantage_base_url.clone(),
            });
        }
        Ok(())
    }
}

// The API key never reaches logs.
impl Debug for PricecastConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricecastConfig")
            .field("alphavantage_api_key", &"<redacted>")
            .field("alphavantage_base_url", &self.alphavantage_base_url)
            .field("http_timeout_ms", &self.http_timeout_ms)
            .field("history_months", &self.history_months)
            .field("simulation_seed", &self.simulation_seed)
            .finish()
    }
}

fn parse_setting<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidConfig {
        key,
        value: raw.to_owned(),
    })
}
