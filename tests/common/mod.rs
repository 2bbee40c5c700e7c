#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use tradelog::domain::analysis::AnalysisConfig;
use tradelog::domain::error::{MalformedInput, TradelogError};
use tradelog::domain::trade::{TradeLog, TradeRecord};
use tradelog::ports::trade_log_port::TradeLogPort;

/// The three-trade log used throughout: one win of 10, one loss of 10, one win of 20.
pub const MIXED_LOG: &str = "\
,Entry Date,Symbol,Entry Price,Exit Price
0,2024-01-02,BHP,100,110
1,2024-01-05,CBA,100,90
2,2024-01-09,WBC,50,70
";

/// Two 30-point wins and one 10-point loss: clears every threshold.
pub const STRONG_LOG: &str = "\
Entry Price,Exit Price,Symbol
100,130,BHP
200,230,CBA
80,70,
";

pub struct MockTradeLogPort {
    pub log: Option<TradeLog>,
    pub error: Option<MalformedInput>,
}

impl MockTradeLogPort {
    pub fn with_trades(pairs: &[(f64, f64)]) -> Self {
        Self {
            log: Some(TradeLog::new(make_trades(pairs))),
            error: None,
        }
    }

    pub fn with_error(kind: MalformedInput) -> Self {
        Self {
            log: None,
            error: Some(kind),
        }
    }
}

impl TradeLogPort for MockTradeLogPort {
    fn load_trade_log(&self) -> Result<TradeLog, TradelogError> {
        if let Some(kind) = &self.error {
            return Err(TradelogError::MalformedInput {
                source_name: "mock".into(),
                kind: kind.clone(),
            });
        }
        Ok(self.log.clone().unwrap_or_else(|| TradeLog::new(Vec::new())))
    }
}

pub fn make_trades(pairs: &[(f64, f64)]) -> Vec<TradeRecord> {
    pairs
        .iter()
        .map(|&(entry, exit)| TradeRecord::new(entry, exit))
        .collect()
}

pub fn sample_config() -> AnalysisConfig {
    AnalysisConfig {
        initial_portfolio_value: 6500.0,
        risk_free_rate: 0.05,
    }
}

pub fn write_temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn write_in_dir(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
