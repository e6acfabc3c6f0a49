pub mod alphavantage;
pub mod simulated;

pub use alphavantage::AlphaVantageAdapter;
pub use simulated::{ListedCompany, SimulatedExchange, NGX_CATALOG};
