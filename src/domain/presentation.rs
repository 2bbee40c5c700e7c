//! Labelled view of a [`MetricsReport`] for the report adapters.

use super::error::Metric;
use super::metrics::{MetricValue, MetricsReport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryValue<'a> {
    Count(usize),
    Metric(&'a MetricValue),
}

/// One line of the report: a stable key, a human label and the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportEntry<'a> {
    pub key: &'static str,
    pub label: &'static str,
    pub value: EntryValue<'a>,
    pub suffix: &'static str,
}

impl ReportEntry<'_> {
    pub fn number(&self) -> Option<f64> {
        match self.value {
            EntryValue::Count(n) => Some(n as f64),
            EntryValue::Metric(Ok(v)) => Some(*v),
            EntryValue::Metric(Err(_)) => None,
        }
    }

    pub fn error(&self) -> Option<String> {
        match self.value {
            EntryValue::Metric(Err(e)) => Some(e.cause().to_string()),
            _ => None,
        }
    }

    pub fn formatted(&self) -> String {
        match self.value {
            EntryValue::Count(n) => n.to_string(),
            EntryValue::Metric(Ok(v)) => format!("{v}{}", self.suffix),
            EntryValue::Metric(Err(e)) => format!("undefined ({})", e.cause()),
        }
    }
}

fn count_entry(key: &'static str, label: &'static str, n: usize) -> ReportEntry<'static> {
    ReportEntry {
        key,
        label,
        value: EntryValue::Count(n),
        suffix: "",
    }
}

fn metric_entry(metric: Metric, value: &MetricValue) -> ReportEntry<'_> {
    let suffix = if metric == Metric::MaxDrawdownPercentage {
        "%"
    } else {
        ""
    };
    ReportEntry {
        key: metric.key(),
        label: metric.label(),
        value: EntryValue::Metric(value),
        suffix,
    }
}

impl MetricsReport {
    /// Report fields in display order.
    pub fn entries(&self) -> Vec<ReportEntry<'_>> {
        vec![
            count_entry("total_trades", "Total Trades", self.total_trades),
            count_entry(
                "profitable_trades",
                "Profitable Trades",
                self.profitable_trades,
            ),
            count_entry(
                "loss_making_trades",
                "Loss-Making Trades",
                self.loss_making_trades,
            ),
            metric_entry(Metric::WinRate, &self.win_rate),
            metric_entry(
                Metric::AverageProfitPerTrade,
                &self.average_profit_per_trade,
            ),
            metric_entry(Metric::AverageLossPerTrade, &self.average_loss_per_trade),
            metric_entry(Metric::RiskRewardRatio, &self.risk_reward_ratio),
            metric_entry(Metric::Expectancy, &self.expectancy),
            metric_entry(
                Metric::AverageReturnPerTrade,
                &self.average_return_per_trade,
            ),
            metric_entry(Metric::SharpeRatio, &self.sharpe_ratio),
            metric_entry(Metric::MaxDrawdown, &self.max_drawdown),
            metric_entry(
                Metric::MaxDrawdownPercentage,
                &self.max_drawdown_percentage,
            ),
            metric_entry(Metric::Cagr, &self.cagr),
            metric_entry(Metric::CalmarRatio, &self.calmar_ratio),
        ]
    }

    pub fn labelled_values(&self) -> Vec<(&'static str, String)> {
        self.entries()
            .iter()
            .map(|e| (e.label, e.formatted()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::analysis::AnalysisConfig;
    use crate::domain::metrics::MetricsReport;
    use crate::domain::trade::TradeRecord;

    fn report(pairs: &[(f64, f64)]) -> MetricsReport {
        let trades: Vec<TradeRecord> = pairs
            .iter()
            .map(|&(a, b)| TradeRecord::new(a, b))
            .collect();
        MetricsReport::compute(&trades, &AnalysisConfig::default())
    }

    #[test]
    fn labels_in_display_order() {
        let r = report(&[(100.0, 110.0), (100.0, 90.0), (50.0, 70.0)]);
        let labels: Vec<&str> = r.labelled_values().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "Total Trades",
                "Profitable Trades",
                "Loss-Making Trades",
                "Win Rate",
                "Average Profit per Trade",
                "Average Loss per Trade",
                "Risk Reward Ratio",
                "Expectancy",
                "Average ROR per Trade",
                "Sharpe Ratio",
                "Max Drawdown",
                "Max Drawdown Percentage",
                "CAGR",
                "Calmar Ratio",
            ]
        );
    }

    #[test]
    fn counts_and_percent_suffix() {
        let r = report(&[(100.0, 110.0), (100.0, 90.0), (50.0, 70.0)]);
        let values = r.labelled_values();
        assert_eq!(values[0].1, "3");
        assert_eq!(values[5].1, "10");
        assert!(values[11].1.ends_with('%'));
    }

    #[test]
    fn undefined_values_show_reason() {
        let r = report(&[(100.0, 100.0)]);
        let entries = r.entries();
        let loss = entries
            .iter()
            .find(|e| e.key == "average_loss_per_trade")
            .unwrap();
        assert_eq!(loss.formatted(), "undefined (no losing trades)");
        assert_eq!(loss.number(), None);
        assert_eq!(loss.error().as_deref(), Some("no losing trades"));
    }
}
