//! Plain-text report adapter.

use std::fmt::Write as _;

use crate::domain::analysis::AnalysisConfig;
use crate::domain::error::TradelogError;
use crate::domain::metrics::MetricsReport;
use crate::domain::trade::TradeLog;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for TextReportAdapter {
    fn render(
        &self,
        _log: &TradeLog,
        report: &MetricsReport,
        config: &AnalysisConfig,
    ) -> Result<String, TradelogError> {
        let mut out = String::new();
        let fmt_err = |e: std::fmt::Error| TradelogError::Report {
            reason: e.to_string(),
        };

        writeln!(out, "=== Trade Log Analysis ===").map_err(fmt_err)?;
        writeln!(
            out,
            "Initial Portfolio Value: {}",
            config.initial_portfolio_value
        )
        .map_err(fmt_err)?;
        writeln!(out, "Risk-Free Rate: {}", config.risk_free_rate).map_err(fmt_err)?;

        writeln!(out, "\n=== Calculated Parameters ===").map_err(fmt_err)?;
        for (label, value) in report.labelled_values() {
            writeln!(out, "{label}: {value}").map_err(fmt_err)?;
        }

        writeln!(out, "\n=== Decision ===").map_err(fmt_err)?;
        writeln!(
            out,
            "Based on the calculated parameters, the decision is to: {}",
            report.decision
        )
        .map_err(fmt_err)?;
        let missing = report.decision.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|m| m.label()).collect();
            writeln!(out, "Undefined inputs: {}", names.join(", ")).map_err(fmt_err)?;
        }

        Ok(out)
    }
}
