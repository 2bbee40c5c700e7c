//! JSON report adapter for machine consumers.

use serde::Serialize;

use crate::domain::analysis::AnalysisConfig;
use crate::domain::error::{Metric, TradelogError};
use crate::domain::metrics::MetricsReport;
use crate::domain::presentation::EntryValue;
use crate::domain::trade::TradeLog;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct JsonMetric {
    name: &'static str,
    label: &'static str,
    value: Option<f64>,
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a AnalysisConfig,
    total_trades: usize,
    profitable_trades: usize,
    loss_making_trades: usize,
    metrics: Vec<JsonMetric>,
    portfolio_values: &'a [f64],
    decision: String,
    missing: &'a [Metric],
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for JsonReportAdapter {
    fn render(
        &self,
        _log: &TradeLog,
        report: &MetricsReport,
        config: &AnalysisConfig,
    ) -> Result<String, TradelogError> {
        let metrics = report
            .entries()
            .into_iter()
            .filter(|e| matches!(e.value, EntryValue::Metric(_)))
            .map(|e| JsonMetric {
                name: e.key,
                label: e.label,
                value: e.number(),
                error: e.error(),
            })
            .collect();

        let doc = JsonReport {
            config,
            total_trades: report.total_trades,
            profitable_trades: report.profitable_trades,
            loss_making_trades: report.loss_making_trades,
            metrics,
            portfolio_values: &report.portfolio_values,
            decision: report.decision.to_string(),
            missing: report.decision.missing(),
        };

        let mut json = serde_json::to_string_pretty(&doc).map_err(|e| TradelogError::Report {
            reason: e.to_string(),
        })?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TradeRecord;
    use serde_json::Value;

    fn render(pairs: &[(f64, f64)]) -> Value {
        let log = TradeLog::new(
            pairs
                .iter()
                .map(|&(a, b)| TradeRecord::new(a, b))
                .collect(),
        );
        let config = AnalysisConfig::default();
        let report = MetricsReport::compute(&log.trades, &config);
        let json = JsonReportAdapter::new()
            .render(&log, &report, &config)
            .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn counts_config_and_decision() {
        let v = render(&[(100.0, 110.0), (100.0, 90.0), (50.0, 70.0)]);
        assert_eq!(v["total_trades"], 3);
        assert_eq!(v["profitable_trades"], 2);
        assert_eq!(v["loss_making_trades"], 1);
        assert_eq!(v["config"]["initial_portfolio_value"], 6500.0);
        assert_eq!(v["decision"], "Do Not Execute");
        assert_eq!(v["missing"].as_array().unwrap().len(), 0);
        assert_eq!(v["portfolio_values"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn metrics_carry_value_or_error() {
        let v = render(&[(100.0, 100.0)]);
        let metrics = v["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 11);

        let loss = metrics
            .iter()
            .find(|m| m["name"] == "average_loss_per_trade")
            .unwrap();
        assert!(loss["value"].is_null());
        assert_eq!(loss["error"], "no losing trades");

        let win = metrics.iter().find(|m| m["name"] == "win_rate").unwrap();
        assert_eq!(win["value"], 0.0);
        assert!(win["error"].is_null());

        assert_eq!(v["decision"], "Indeterminate");
        assert_eq!(
            v["missing"],
            serde_json::json!(["expectancy", "risk_reward_ratio", "calmar_ratio"])
        );
    }
}
