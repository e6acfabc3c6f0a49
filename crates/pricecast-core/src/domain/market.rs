use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Market regime a projection is computed for.
///
/// The regime is always passed explicitly; it selects the data source, the
/// growth multiplier and the starting confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// US-listed equities quoted by Alpha Vantage.
    #[serde(rename = "us", alias = "primary")]
    Primary,
    /// Nigerian Exchange equities, served from simulated data.
    #[serde(rename = "ngx", alias = "secondary")]
    Secondary,
}

impl Market {
    pub const ALL: [Self; 2] = [Self::Primary, Self::Secondary];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "us",
            Self::Secondary => "ngx",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "US Market",
            Self::Secondary => "Nigerian Market",
        }
    }

    pub const fn currency(self) -> &'static str {
        match self {
            Self::Primary => "USD",
            Self::Secondary => "NGN",
        }
    }

    /// Scalar applied to blended growth; the secondary market is modeled as a
    /// higher-growth regime.
    pub const fn growth_multiplier(self) -> f64 {
        match self {
            Self::Primary => 1.0,
            Self::Secondary => 1.15,
        }
    }

    /// Confidence before horizon and volatility deductions.
    pub const fn base_confidence(self) -> f64 {
        match self {
            Self::Primary => 85.0,
            Self::Secondary => 80.0,
        }
    }
}

impl Display for Market {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "us" | "primary" => Ok(Self::Primary),
            "ngx" | "nigeria" | "secondary" => Ok(Self::Secondary),
            other => Err(ValidationError::InvalidMarket {
                value: other.to_owned(),
            }),
        }
    }
}
