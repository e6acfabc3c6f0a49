use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Market, ValidationError};

/// Identifiers for the data sources recorded in envelope `source_chain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Alphavantage,
    Simulated,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Alphavantage, Self::Simulated];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alphavantage => "alphavantage",
            Self::Simulated => "simulated",
        }
    }

    /// Source that serves `market` by default.
    pub const fn default_for(market: Market) -> Self {
        match market {
            Market::Primary => Self::Alphavantage,
            Market::Secondary => Self::Simulated,
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alphavantage" => Ok(Self::Alphavantage),
            "simulated" => Ok(Self::Simulated),
            other => Err(ValidationError::InvalidConfig {
                key: "source",
                value: other.to_owned(),
            }),
        }
    }
}
