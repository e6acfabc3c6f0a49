//! CLI argument definitions for pricecast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `predict` | Project a symbol's price to a future year |
//! | `quote` | Fetch the latest quote |
//! | `history` | Fetch monthly closing prices |
//! | `markets` | Show market parameters and the NGX catalog |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--timeout-ms` | env or `5000` | Upstream request timeout |
//! | `--seed` | env or unset | Seed for the simulated exchange |
//! | `--api-key` | env or `demo` | Alpha Vantage API key |
//!
//! # Examples
//!
//! ```bash
//! pricecast predict AAPL --year 2030
//! pricecast predict DANGCEM --market ngx --year 2028 --format table
//! pricecast history MTNN --market ngx --months 36 --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use pricecast_core::Market;

/// Stock price projections for the US and Nigerian markets.
#[derive(Debug, Parser)]
#[command(
    name = "pricecast",
    author,
    version,
    about = "Stock price projections for US and Nigerian markets",
    long_about = "pricecast estimates a stock's future price from its recent monthly \
history. US symbols are served by Alpha Vantage; NGX symbols come from a \
simulated exchange.\n\
\n\
Use 'pricecast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Upstream request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Seed for the simulated exchange, for reproducible output.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Alpha Vantage API key.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Table,
    /// Single JSON object output.
    Json,
    /// Compact JSON, one envelope per line.
    Ndjson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarketArg {
    /// US market via Alpha Vantage.
    #[value(alias = "primary")]
    Us,
    /// Nigerian Exchange (simulated).
    #[value(alias = "secondary", alias = "nigeria")]
    Ngx,
}

impl From<MarketArg> for Market {
    fn from(value: MarketArg) -> Self {
        match value {
            MarketArg::Us => Market::Primary,
            MarketArg::Ngx => Market::Secondary,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Project a symbol's price to a future year.
    ///
    /// # Examples
    ///
    ///   pricecast predict AAPL --year 2030
    ///   pricecast predict GTCO --market ngx --year 2027 --format table
    Predict(PredictArgs),

    /// Fetch the latest quote for a symbol.
    Quote(QuoteArgs),

    /// Fetch monthly closing prices, oldest first.
    History(HistoryArgs),

    /// Show market parameters and the simulated NGX catalog.
    Markets,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Ticker symbol (e.g., AAPL, DANGCEM).
    pub symbol: String,

    /// Target year; must be after the current year.
    #[arg(long)]
    pub year: i32,

    #[arg(long, value_enum, default_value_t = MarketArg::Us)]
    pub market: MarketArg,

    /// Months of history to estimate from.
    #[arg(long)]
    pub months: Option<usize>,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    pub symbol: String,

    #[arg(long, value_enum, default_value_t = MarketArg::Us)]
    pub market: MarketArg,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    pub symbol: String,

    #[arg(long, value_enum, default_value_t = MarketArg::Us)]
    pub market: MarketArg,

    #[arg(long)]
    pub months: Option<usize>,
}
