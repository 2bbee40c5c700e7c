//! Domain error types.
//!
//! Two tiers: [`TradelogError`] is fatal and stops a run before any metric is
//! computed; [`MetricError`] is attached to a single metric and never aborts
//! the rest of the report.

use std::fmt;

/// Identifies one derived metric in a [`MetricsReport`](super::metrics::MetricsReport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    WinRate,
    AverageProfitPerTrade,
    AverageLossPerTrade,
    RiskRewardRatio,
    Expectancy,
    StepReturns,
    AverageReturnPerTrade,
    SharpeRatio,
    MaxDrawdown,
    MaxDrawdownPercentage,
    Cagr,
    CalmarRatio,
}

impl Metric {
    /// Human label used by the report adapters.
    pub fn label(self) -> &'static str {
        match self {
            Metric::WinRate => "Win Rate",
            Metric::AverageProfitPerTrade => "Average Profit per Trade",
            Metric::AverageLossPerTrade => "Average Loss per Trade",
            Metric::RiskRewardRatio => "Risk Reward Ratio",
            Metric::Expectancy => "Expectancy",
            Metric::StepReturns => "Step Returns",
            Metric::AverageReturnPerTrade => "Average ROR per Trade",
            Metric::SharpeRatio => "Sharpe Ratio",
            Metric::MaxDrawdown => "Max Drawdown",
            Metric::MaxDrawdownPercentage => "Max Drawdown Percentage",
            Metric::Cagr => "CAGR",
            Metric::CalmarRatio => "Calmar Ratio",
        }
    }

    /// Stable snake_case key, as used in JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Metric::WinRate => "win_rate",
            Metric::AverageProfitPerTrade => "average_profit_per_trade",
            Metric::AverageLossPerTrade => "average_loss_per_trade",
            Metric::RiskRewardRatio => "risk_reward_ratio",
            Metric::Expectancy => "expectancy",
            Metric::StepReturns => "step_returns",
            Metric::AverageReturnPerTrade => "average_return_per_trade",
            Metric::SharpeRatio => "sharpe_ratio",
            Metric::MaxDrawdown => "max_drawdown",
            Metric::MaxDrawdownPercentage => "max_drawdown_percentage",
            Metric::Cagr => "cagr",
            Metric::CalmarRatio => "calmar_ratio",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a metric could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum Undefined {
    /// The named denominator evaluated to zero.
    ZeroDenominator(&'static str),
    /// The named sample had no elements.
    EmptySample(&'static str),
    /// An input metric was itself undefined.
    Upstream(Metric),
    /// The named quantity overflowed to infinity or NaN.
    NonFinite(&'static str),
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undefined::ZeroDenominator(name) => write!(f, "{name} is zero"),
            Undefined::EmptySample(name) => write!(f, "no {name}"),
            Undefined::Upstream(metric) => write!(f, "depends on undefined {metric}"),
            Undefined::NonFinite(name) => write!(f, "{name} is not finite"),
        }
    }
}

/// Per-metric failure. Never aborts the report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("{metric} is undefined: {cause}")]
    DivisionUndefined { metric: Metric, cause: Undefined },
}

impl MetricError {
    pub fn zero_denominator(metric: Metric, denominator: &'static str) -> Self {
        MetricError::DivisionUndefined {
            metric,
            cause: Undefined::ZeroDenominator(denominator),
        }
    }

    pub fn empty_sample(metric: Metric, sample: &'static str) -> Self {
        MetricError::DivisionUndefined {
            metric,
            cause: Undefined::EmptySample(sample),
        }
    }

    pub fn upstream(metric: Metric, input: Metric) -> Self {
        MetricError::DivisionUndefined {
            metric,
            cause: Undefined::Upstream(input),
        }
    }

    pub fn non_finite(metric: Metric, quantity: &'static str) -> Self {
        MetricError::DivisionUndefined {
            metric,
            cause: Undefined::NonFinite(quantity),
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            MetricError::DivisionUndefined { metric, .. } => *metric,
        }
    }

    pub fn cause(&self) -> &Undefined {
        match self {
            MetricError::DivisionUndefined { cause, .. } => cause,
        }
    }
}

/// The ways a trade log can be rejected before any computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedInput {
    #[error("missing required column \"{column}\"")]
    MissingColumn { column: String },

    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidPrice {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV parse error: {reason}")]
    Csv { reason: String },
}

/// Top-level error type for tradelog.
#[derive(Debug, thiserror::Error)]
pub enum TradelogError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("malformed trade log {source_name}: {kind}")]
    MalformedInput {
        source_name: String,
        kind: MalformedInput,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradelogError> for std::process::ExitCode {
    fn from(err: &TradelogError) -> Self {
        let code: u8 = match err {
            TradelogError::Io(_) | TradelogError::Report { .. } => 1,
            TradelogError::ConfigParse { .. }
            | TradelogError::ConfigMissing { .. }
            | TradelogError::ConfigInvalid { .. } => 2,
            TradelogError::MalformedInput { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
