//! Configuration validation.
//!
//! Everything here runs before the trade log is opened, so a bad setting is
//! reported without touching the input file.

use super::analysis::{AnalysisConfig, InputConfig};
use super::error::TradelogError;
use crate::ports::config_port::ConfigPort;

pub const REPORT_FORMATS: [&str; 3] = ["text", "html", "json"];

/// Read a numeric key, falling back to `default` when absent. A present but
/// unparseable value is an error rather than a silent default.
pub fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TradelogError> {
    match config.get_value(section, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<f64>().map_err(|_| TradelogError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected a number, got {raw:?}"),
        }),
    }
}

pub fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), TradelogError> {
    validate_initial_portfolio_value(config.initial_portfolio_value)?;
    validate_risk_free_rate(config.risk_free_rate)?;
    Ok(())
}

pub fn validate_input_config(config: &InputConfig) -> Result<(), TradelogError> {
    if config.trade_log.as_os_str().is_empty() {
        return Err(invalid("input", "trade_log", "trade_log must not be empty"));
    }
    if config.entry_column.trim().is_empty() {
        return Err(invalid(
            "input",
            "entry_column",
            "entry_column must not be empty",
        ));
    }
    if config.exit_column.trim().is_empty() {
        return Err(invalid("input", "exit_column", "exit_column must not be empty"));
    }
    if config.entry_column.trim() == config.exit_column.trim() {
        return Err(invalid(
            "input",
            "exit_column",
            "entry_column and exit_column must differ",
        ));
    }
    Ok(())
}

pub fn validate_report_format(format: &str) -> Result<(), TradelogError> {
    let normalized = format.trim().to_lowercase();
    if REPORT_FORMATS.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(invalid(
            "report",
            "format",
            &format!("unknown format {format:?}, expected one of text, html, json"),
        ))
    }
}

fn validate_initial_portfolio_value(value: f64) -> Result<(), TradelogError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "analysis",
            "initial_portfolio_value",
            "initial_portfolio_value must be a positive number",
        ));
    }
    Ok(())
}

/// Any finite rate is accepted, negative or above 1 included.
fn validate_risk_free_rate(value: f64) -> Result<(), TradelogError> {
    if !value.is_finite() {
        return Err(invalid(
            "analysis",
            "risk_free_rate",
            "risk_free_rate must be a finite number",
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TradelogError {
    TradelogError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
