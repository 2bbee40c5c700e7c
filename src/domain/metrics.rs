//! Performance metrics and the go/no-go decision.
//!
//! Every ratio is a [`MetricValue`]: a zero denominator or an empty sample
//! yields a named [`MetricError`] instead of NaN or infinity, and metrics
//! built on an undefined input are themselves undefined.

use super::analysis::AnalysisConfig;
use super::decision::Decision;
use super::error::{Metric, MetricError};
use super::trade::TradeRecord;
use tracing::debug;

pub type MetricValue = Result<f64, MetricError>;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub loss_making_trades: usize,
    pub win_rate: MetricValue,
    pub average_profit_per_trade: MetricValue,
    pub average_loss_per_trade: MetricValue,
    pub risk_reward_ratio: MetricValue,
    pub expectancy: MetricValue,
    pub average_return_per_trade: MetricValue,
    pub sharpe_ratio: MetricValue,
    pub max_drawdown: MetricValue,
    pub max_drawdown_percentage: MetricValue,
    pub cagr: MetricValue,
    pub calmar_ratio: MetricValue,
    /// Portfolio value before the first trade and after each one.
    pub portfolio_values: Vec<f64>,
    pub decision: Decision,
}

impl MetricsReport {
    pub fn compute(trades: &[TradeRecord], config: &AnalysisConfig) -> Self {
        let total_trades = trades.len();
        let profitable_trades = trades.iter().filter(|t| t.is_profitable()).count();
        let loss_making_trades = total_trades - profitable_trades;

        let win_rate = divide(
            Metric::WinRate,
            profitable_trades as f64,
            total_trades as f64,
            "total trades",
        );

        let profits = trade_profits(trades);
        let average_profit_per_trade = mean(&profits)
            .ok_or_else(|| MetricError::empty_sample(Metric::AverageProfitPerTrade, "trades"))
            .and_then(|m| finite(Metric::AverageProfitPerTrade, m, "sum of profits"));

        let losses: Vec<f64> = profits.iter().copied().filter(|&p| p < 0.0).collect();
        let average_loss_per_trade = mean(&losses)
            .map(|m| -m)
            .ok_or_else(|| MetricError::empty_sample(Metric::AverageLossPerTrade, "losing trades"))
            .and_then(|m| finite(Metric::AverageLossPerTrade, m, "sum of losses"));

        let risk_reward_ratio =
            compute_risk_reward(&average_profit_per_trade, &average_loss_per_trade);
        let expectancy =
            compute_expectancy(&win_rate, &average_profit_per_trade, &average_loss_per_trade);

        let portfolio_values = portfolio_trajectory(trades, config.initial_portfolio_value);
        let returns = step_returns(&portfolio_values);

        let (average_return_per_trade, sharpe_ratio) =
            compute_risk_adjusted(&returns, config.risk_free_rate);
        let (max_drawdown, max_drawdown_percentage) = compute_drawdown(&returns);

        let cagr = compute_cagr(
            &portfolio_values,
            config.initial_portfolio_value,
            total_trades,
        );
        let calmar_ratio = compute_calmar(&cagr, &max_drawdown_percentage);

        let decision = Decision::evaluate(&win_rate, &expectancy, &risk_reward_ratio, &calmar_ratio);

        debug!(
            total_trades,
            profitable_trades,
            loss_making_trades,
            decision = %decision,
            "metrics computed"
        );

        MetricsReport {
            total_trades,
            profitable_trades,
            loss_making_trades,
            win_rate,
            average_profit_per_trade,
            average_loss_per_trade,
            risk_reward_ratio,
            expectancy,
            average_return_per_trade,
            sharpe_ratio,
            max_drawdown,
            max_drawdown_percentage,
            cagr,
            calmar_ratio,
            portfolio_values,
            decision,
        }
    }

    /// Every metric that could not be computed, in report order.
    pub fn failures(&self) -> Vec<&MetricError> {
        [
            &self.win_rate,
            &self.average_profit_per_trade,
            &self.average_loss_per_trade,
            &self.risk_reward_ratio,
            &self.expectancy,
            &self.average_return_per_trade,
            &self.sharpe_ratio,
            &self.max_drawdown,
            &self.max_drawdown_percentage,
            &self.cagr,
            &self.calmar_ratio,
        ]
        .into_iter()
        .filter_map(|v| v.as_ref().err())
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Exit minus entry for each trade, in trade order.
pub fn trade_profits(trades: &[TradeRecord]) -> Vec<f64> {
    trades.iter().map(TradeRecord::profit).collect()
}

/// Profitable trades add their profit; losing and break-even trades leave the
/// value unchanged. Losses are never subtracted, so the curve only rises.
/// Values past `f64::MAX` become infinite here and are rejected by
/// [`step_returns`] and the growth rate.
pub fn portfolio_trajectory(trades: &[TradeRecord], initial_value: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(trades.len() + 1);
    let mut current = initial_value;
    values.push(current);
    for trade in trades {
        let profit = trade.profit();
        if profit > 0.0 {
            current += profit;
        }
        values.push(current);
    }
    values
}

/// Simple return between each adjacent pair of portfolio values.
pub fn step_returns(values: &[f64]) -> Result<Vec<f64>, MetricError> {
    values
        .windows(2)
        .map(|w| {
            let prev = w[0];
            let curr = w[1];
            if prev == 0.0 {
                Err(MetricError::zero_denominator(
                    Metric::StepReturns,
                    "portfolio value",
                ))
            } else if !prev.is_finite() || !curr.is_finite() {
                Err(MetricError::non_finite(
                    Metric::StepReturns,
                    "portfolio value",
                ))
            } else {
                finite(Metric::StepReturns, (curr - prev) / prev, "step return")
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divisor n).
pub fn population_stddev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0_f64, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

fn divide(metric: Metric, numerator: f64, denominator: f64, name: &'static str) -> MetricValue {
    if denominator == 0.0 {
        Err(MetricError::zero_denominator(metric, name))
    } else {
        finite(metric, numerator / denominator, "quotient")
    }
}

/// Every `Ok` metric is finite; overflow becomes a named failure.
fn finite(metric: Metric, value: f64, quantity: &'static str) -> MetricValue {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricError::non_finite(metric, quantity))
    }
}

fn require(metric: Metric, input: Metric, value: &MetricValue) -> MetricValue {
    value
        .as_ref()
        .copied()
        .map_err(|_| MetricError::upstream(metric, input))
}

fn compute_risk_reward(average_profit: &MetricValue, average_loss: &MetricValue) -> MetricValue {
    let profit = require(
        Metric::RiskRewardRatio,
        Metric::AverageProfitPerTrade,
        average_profit,
    )?;
    let loss = require(
        Metric::RiskRewardRatio,
        Metric::AverageLossPerTrade,
        average_loss,
    )?;
    divide(
        Metric::RiskRewardRatio,
        profit,
        loss,
        "average loss per trade",
    )
}

fn compute_expectancy(
    win_rate: &MetricValue,
    average_profit: &MetricValue,
    average_loss: &MetricValue,
) -> MetricValue {
    let win_rate = require(Metric::Expectancy, Metric::WinRate, win_rate)?;
    let profit = require(
        Metric::Expectancy,
        Metric::AverageProfitPerTrade,
        average_profit,
    )?;
    let loss = require(Metric::Expectancy, Metric::AverageLossPerTrade, average_loss)?;
    let loss_rate = 1.0 - win_rate;
    finite(
        Metric::Expectancy,
        win_rate * profit - loss_rate * loss,
        "weighted profit",
    )
}

/// Returns (average return per trade, Sharpe ratio). Both divide by the same
/// standard deviation, and the risk-free rate is taken off at each step.
fn compute_risk_adjusted(
    returns: &Result<Vec<f64>, MetricError>,
    risk_free_rate: f64,
) -> (MetricValue, MetricValue) {
    let returns = match returns {
        Ok(r) => r,
        Err(_) => {
            return (
                Err(MetricError::upstream(
                    Metric::AverageReturnPerTrade,
                    Metric::StepReturns,
                )),
                Err(MetricError::upstream(Metric::SharpeRatio, Metric::StepReturns)),
            );
        }
    };

    let (Some(mean_return), Some(stddev)) = (mean(returns), population_stddev(returns)) else {
        return (
            Err(MetricError::empty_sample(
                Metric::AverageReturnPerTrade,
                "step returns",
            )),
            Err(MetricError::empty_sample(Metric::SharpeRatio, "step returns")),
        );
    };
    for (value, quantity) in [
        (mean_return, "mean step return"),
        (stddev, "standard deviation of returns"),
    ] {
        if !value.is_finite() {
            return (
                Err(MetricError::non_finite(Metric::AverageReturnPerTrade, quantity)),
                Err(MetricError::non_finite(Metric::SharpeRatio, quantity)),
            );
        }
    }

    let average_return = divide(
        Metric::AverageReturnPerTrade,
        mean_return - risk_free_rate,
        stddev,
        "standard deviation of returns",
    );
    let sharpe = match &average_return {
        Ok(avg) => divide(
            Metric::SharpeRatio,
            avg - risk_free_rate,
            stddev,
            "standard deviation of returns",
        ),
        Err(e) => Err(MetricError::DivisionUndefined {
            metric: Metric::SharpeRatio,
            cause: e.cause().clone(),
        }),
    };

    (average_return, sharpe)
}

/// Returns (max drawdown, max drawdown percentage) over the cumulative sum of
/// step returns: peak minus trough, and that gap as a percentage of the peak.
fn compute_drawdown(returns: &Result<Vec<f64>, MetricError>) -> (MetricValue, MetricValue) {
    let returns = match returns {
        Ok(r) => r,
        Err(_) => {
            return (
                Err(MetricError::upstream(Metric::MaxDrawdown, Metric::StepReturns)),
                Err(MetricError::upstream(
                    Metric::MaxDrawdownPercentage,
                    Metric::StepReturns,
                )),
            );
        }
    };

    if returns.is_empty() {
        return (
            Err(MetricError::empty_sample(Metric::MaxDrawdown, "step returns")),
            Err(MetricError::empty_sample(
                Metric::MaxDrawdownPercentage,
                "step returns",
            )),
        );
    }

    let cumulative = cumulative_sum(returns);
    let peak = cumulative.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let trough = cumulative.iter().copied().fold(f64::INFINITY, f64::min);
    if !peak.is_finite() || !trough.is_finite() {
        return (
            Err(MetricError::non_finite(Metric::MaxDrawdown, "cumulative return")),
            Err(MetricError::non_finite(
                Metric::MaxDrawdownPercentage,
                "cumulative return",
            )),
        );
    }

    let max_drawdown = finite(Metric::MaxDrawdown, peak - trough, "peak minus trough");
    let percentage = match &max_drawdown {
        Ok(drawdown) => divide(
            Metric::MaxDrawdownPercentage,
            drawdown * 100.0,
            peak,
            "peak cumulative return",
        ),
        Err(_) => Err(MetricError::upstream(
            Metric::MaxDrawdownPercentage,
            Metric::MaxDrawdown,
        )),
    };

    (max_drawdown, percentage)
}

/// Growth per trade: trade count stands in for elapsed time.
fn compute_cagr(portfolio_values: &[f64], initial_value: f64, total_trades: usize) -> MetricValue {
    if total_trades == 0 {
        return Err(MetricError::zero_denominator(Metric::Cagr, "total trades"));
    }
    if initial_value == 0.0 {
        return Err(MetricError::zero_denominator(
            Metric::Cagr,
            "initial portfolio value",
        ));
    }
    let final_value = portfolio_values.last().copied().unwrap_or(initial_value);
    if !final_value.is_finite() {
        return Err(MetricError::non_finite(Metric::Cagr, "final portfolio value"));
    }
    finite(
        Metric::Cagr,
        (final_value / initial_value).powf(1.0 / total_trades as f64) - 1.0,
        "growth rate",
    )
}

fn compute_calmar(cagr: &MetricValue, max_drawdown_percentage: &MetricValue) -> MetricValue {
    let cagr = require(Metric::CalmarRatio, Metric::Cagr, cagr)?;
    let percentage = require(
        Metric::CalmarRatio,
        Metric::MaxDrawdownPercentage,
        max_drawdown_percentage,
    )?;
    divide(
        Metric::CalmarRatio,
        cagr,
        percentage,
        "max drawdown percentage",
    )
}
