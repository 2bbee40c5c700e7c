//! HTML report adapter implementing ReportPort.
//!
//! Renders the trade table, the calculated parameters and the decision as a
//! single self-contained page using an inline Askama template.

use askama::Template;

use crate::domain::analysis::AnalysisConfig;
use crate::domain::decision::Decision;
use crate::domain::error::TradelogError;
use crate::domain::metrics::MetricsReport;
use crate::domain::trade::TradeLog;
use crate::ports::report_port::ReportPort;

struct ParameterRow {
    label: &'static str,
    value: String,
    undefined: bool,
}

struct MissingCount {
    column: String,
    count: usize,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Trade Log Analysis</title>
<style>
body { font-family: sans-serif; margin: 2rem; color: #1f2937; }
table { border-collapse: collapse; margin-bottom: 1.5rem; }
th, td { border: 1px solid #d1d5db; padding: 0.25rem 0.75rem; text-align: left; }
.undefined { color: #b45309; }
.decision-execute { color: #15803d; }
.decision-reject { color: #b91c1c; }
.decision-indeterminate { color: #b45309; }
</style>
</head>
<body>
<h1>Trade Log Analysis</h1>

<h2>Trade Log</h2>
<table>
<thead><tr>{% for column in columns %}<th>{{ column }}</th>{% endfor %}</tr></thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}</tbody>
</table>

<h3>Missing Values</h3>
<table>
{% for m in missing_values %}<tr><th>{{ m.column }}</th><td>{{ m.count }}</td></tr>
{% endfor %}</table>

<h2>Settings</h2>
<table>
<tr><th>Initial Portfolio Value</th><td>{{ initial_portfolio_value }}</td></tr>
<tr><th>Risk-Free Rate</th><td>{{ risk_free_rate }}</td></tr>
</table>

<h2>Calculated Parameters</h2>
<table>
{% for p in parameters %}<tr><th>{{ p.label }}</th>{% if p.undefined %}<td class="undefined">{{ p.value }}</td>{% else %}<td>{{ p.value }}</td>{% endif %}</tr>
{% endfor %}</table>

<h2>Portfolio Values</h2>
<table>
<tr><th>Step</th><th>Value</th></tr>
{% for value in portfolio_values %}<tr><td>{{ loop.index0 }}</td><td>{{ value }}</td></tr>
{% endfor %}</table>

<h2>Decision</h2>
<p class="{{ decision_class }}">Based on the calculated parameters, the decision is to: <strong>{{ decision }}</strong></p>
{% if !missing.is_empty() %}<p>Undefined inputs: {{ missing.join(", ") }}</p>
{% endif %}
</body>
</html>
"#
)]
struct ReportTemplate<'a> {
    columns: Vec<&'a str>,
    rows: Vec<Vec<String>>,
    missing_values: Vec<MissingCount>,
    initial_portfolio_value: f64,
    risk_free_rate: f64,
    parameters: Vec<ParameterRow>,
    portfolio_values: &'a [f64],
    decision: String,
    decision_class: &'static str,
    missing: Vec<&'static str>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for HtmlReportAdapter {
    fn render(
        &self,
        log: &TradeLog,
        report: &MetricsReport,
        config: &AnalysisConfig,
    ) -> Result<String, TradelogError> {
        let parameters = report
            .entries()
            .iter()
            .map(|e| ParameterRow {
                label: e.label,
                value: e.formatted(),
                undefined: e.error().is_some(),
            })
            .collect();

        let missing_values = log
            .missing_values()
            .into_iter()
            .map(|(column, count)| MissingCount { column, count })
            .collect();

        let decision_class = match report.decision {
            Decision::Execute => "decision-execute",
            Decision::DoNotExecute => "decision-reject",
            Decision::Indeterminate { .. } => "decision-indeterminate",
        };

        let template = ReportTemplate {
            columns: log.columns(),
            rows: log.rows(),
            missing_values,
            initial_portfolio_value: config.initial_portfolio_value,
            risk_free_rate: config.risk_free_rate,
            parameters,
            portfolio_values: &report.portfolio_values,
            decision: report.decision.to_string(),
            decision_class,
            missing: report.decision.missing().iter().map(|m| m.label()).collect(),
        };

        template.render().map_err(|e| TradelogError::Report {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TradeRecord;
    use std::fs;
    use tempfile::tempdir;

    fn sample_log() -> TradeLog {
        TradeLog {
            entry_column: "Entry Price".into(),
            exit_column: "Exit Price".into(),
            extra_columns: vec!["Symbol".into()],
            trades: vec![
                TradeRecord {
                    entry_price: 100.0,
                    exit_price: 110.0,
                    extra: vec!["BHP".into()],
                },
                TradeRecord {
                    entry_price: 100.0,
                    exit_price: 90.0,
                    extra: vec!["<CBA>".into()],
                },
                TradeRecord {
                    entry_price: 50.0,
                    exit_price: 70.0,
                    extra: vec!["".into()],
                },
            ],
        }
    }

    fn render(log: &TradeLog) -> String {
        let config = AnalysisConfig::default();
        let report = MetricsReport::compute(&log.trades, &config);
        HtmlReportAdapter::new()
            .render(log, &report, &config)
            .unwrap()
    }

    #[test]
    fn includes_trade_table() {
        let html = render(&sample_log());
        assert!(html.contains("<th>Symbol</th>"));
        assert!(html.contains("<td>BHP</td>"));
        assert!(html.contains("<td>110</td>"));
    }

    #[test]
    fn escapes_cell_content() {
        let html = render(&sample_log());
        assert!(html.contains("&lt;CBA&gt;"));
        assert!(!html.contains("<CBA>"));
    }

    #[test]
    fn includes_parameters_and_decision() {
        let html = render(&sample_log());
        assert!(html.contains("Calculated Parameters"));
        assert!(html.contains("<th>Risk Reward Ratio</th>"));
        assert!(html.contains("decision-reject"));
        assert!(html.contains("<strong>Do Not Execute</strong>"));
    }

    #[test]
    fn includes_missing_value_counts() {
        let html = render(&sample_log());
        assert!(html.contains("Missing Values"));
        assert!(html.contains("<tr><th>Symbol</th><td>1</td></tr>"));
    }

    #[test]
    fn indeterminate_marks_undefined_values() {
        let log = TradeLog::new(vec![TradeRecord::new(10.0, 10.0)]);
        let html = render(&log);
        assert!(html.contains("decision-indeterminate"));
        assert!(html.contains("class=\"undefined\""));
        assert!(html.contains("Undefined inputs: Expectancy, Risk Reward Ratio, Calmar Ratio"));
    }

    #[test]
    fn write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/analysis.html");
        let log = sample_log();
        let config = AnalysisConfig::default();
        let report = MetricsReport::compute(&log.trades, &config);

        HtmlReportAdapter::new()
            .write(&log, &report, &config, &path)
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<!DOCTYPE html>"));
    }
}
