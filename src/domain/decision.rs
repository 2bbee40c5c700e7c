//! Go/no-go rule over four metrics.

use std::fmt;

use super::error::Metric;
use super::metrics::MetricValue;

pub const MIN_WIN_RATE: f64 = 0.5;
pub const MIN_EXPECTANCY: f64 = 0.0;
pub const MIN_RISK_REWARD_RATIO: f64 = 1.5;
pub const MIN_CALMAR_RATIO: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Execute,
    DoNotExecute,
    /// At least one input metric was undefined.
    Indeterminate { missing: Vec<Metric> },
}

impl Decision {
    /// All four thresholds are strict. Any undefined input makes the result
    /// indeterminate rather than a rejection.
    pub fn evaluate(
        win_rate: &MetricValue,
        expectancy: &MetricValue,
        risk_reward_ratio: &MetricValue,
        calmar_ratio: &MetricValue,
    ) -> Self {
        match (win_rate, expectancy, risk_reward_ratio, calmar_ratio) {
            (Ok(w), Ok(e), Ok(r), Ok(c)) => {
                if meets_thresholds(*w, *e, *r, *c) {
                    Decision::Execute
                } else {
                    Decision::DoNotExecute
                }
            }
            _ => {
                let missing = [
                    (Metric::WinRate, win_rate),
                    (Metric::Expectancy, expectancy),
                    (Metric::RiskRewardRatio, risk_reward_ratio),
                    (Metric::CalmarRatio, calmar_ratio),
                ]
                .into_iter()
                .filter(|(_, value)| value.is_err())
                .map(|(metric, _)| metric)
                .collect();
                Decision::Indeterminate { missing }
            }
        }
    }

    pub fn is_execute(&self) -> bool {
        matches!(self, Decision::Execute)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Decision::Indeterminate { .. })
    }

    pub fn missing(&self) -> &[Metric] {
        match self {
            Decision::Indeterminate { missing } => missing,
            _ => &[],
        }
    }
}

/// The raw threshold test, with no notion of undefined inputs.
pub fn meets_thresholds(
    win_rate: f64,
    expectancy: f64,
    risk_reward_ratio: f64,
    calmar_ratio: f64,
) -> bool {
    win_rate > MIN_WIN_RATE
        && expectancy > MIN_EXPECTANCY
        && risk_reward_ratio > MIN_RISK_REWARD_RATIO
        && calmar_ratio > MIN_CALMAR_RATIO
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Execute => "Execute",
            Decision::DoNotExecute => "Do Not Execute",
            Decision::Indeterminate { .. } => "Indeterminate",
        })
    }
}
