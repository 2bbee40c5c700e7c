//! Analysis parameters.
//!
//! AnalysisConfig drives the engine; InputConfig tells the loader where the
//! trade log is and which columns hold the prices.

use std::path::PathBuf;

pub const DEFAULT_INITIAL_PORTFOLIO_VALUE: f64 = 6500.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;
pub const DEFAULT_TRADE_LOG: &str = "tradelog.csv";
pub const DEFAULT_ENTRY_COLUMN: &str = "Entry Price";
pub const DEFAULT_EXIT_COLUMN: &str = "Exit Price";

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AnalysisConfig {
    pub initial_portfolio_value: f64,
    pub risk_free_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            initial_portfolio_value: DEFAULT_INITIAL_PORTFOLIO_VALUE,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub trade_log: PathBuf,
    pub entry_column: String,
    pub exit_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            trade_log: PathBuf::from(DEFAULT_TRADE_LOG),
            entry_column: DEFAULT_ENTRY_COLUMN.to_string(),
            exit_column: DEFAULT_EXIT_COLUMN.to_string(),
        }
    }
}
