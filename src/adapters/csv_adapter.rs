//! CSV trade log adapter.

use crate::domain::analysis::InputConfig;
use crate::domain::error::{MalformedInput, TradelogError};
use crate::domain::trade::{TradeLog, TradeRecord};
use crate::ports::trade_log_port::TradeLogPort;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;

pub struct CsvTradeLogAdapter {
    path: PathBuf,
    entry_column: String,
    exit_column: String,
}

impl CsvTradeLogAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self::from_input_config(&InputConfig {
            trade_log: path,
            ..InputConfig::default()
        })
    }

    pub fn from_input_config(config: &InputConfig) -> Self {
        Self {
            path: config.trade_log.clone(),
            entry_column: config.entry_column.trim().to_string(),
            exit_column: config.exit_column.trim().to_string(),
        }
    }
}

impl TradeLogPort for CsvTradeLogAdapter {
    fn load_trade_log(&self) -> Result<TradeLog, TradelogError> {
        let file = File::open(&self.path).map_err(|e| {
            TradelogError::Io(io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", self.path.display(), e),
            ))
        })?;
        let source_name = self.path.display().to_string();
        let log = parse_trade_log(file, &source_name, &self.entry_column, &self.exit_column)?;
        debug!(
            path = %source_name,
            trades = log.len(),
            extra_columns = log.extra_columns.len(),
            "trade log loaded"
        );
        Ok(log)
    }
}

/// Parse a headed CSV trade log. Columns other than the two price columns
/// are kept as text; a leading unnamed index column is dropped.
pub fn parse_trade_log<R: Read>(
    reader: R,
    source_name: &str,
    entry_column: &str,
    exit_column: &str,
) -> Result<TradeLog, TradelogError> {
    let malformed = |kind: MalformedInput| TradelogError::MalformedInput {
        source_name: source_name.to_string(),
        kind,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| {
            malformed(MalformedInput::Csv {
                reason: e.to_string(),
            })
        })?
        .clone();

    let find = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            malformed(MalformedInput::MissingColumn {
                column: name.to_string(),
            })
        })
    };
    let entry_idx = find(entry_column)?;
    let exit_idx = find(exit_column)?;

    let extra_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|&(i, h)| i != entry_idx && i != exit_idx && !is_index_column(h))
        .map(|(i, _)| i)
        .collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| headers[i].to_string()).collect();

    let mut trades = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| {
            malformed(MalformedInput::Csv {
                reason: e.to_string(),
            })
        })?;

        let entry_price = parse_price(record.get(entry_idx), row, entry_column).map_err(malformed)?;
        let exit_price = parse_price(record.get(exit_idx), row, exit_column).map_err(malformed)?;
        let extra = extra_idx
            .iter()
            .map(|&j| record.get(j).unwrap_or_default().to_string())
            .collect();

        trades.push(TradeRecord {
            entry_price,
            exit_price,
            extra,
        });
    }

    Ok(TradeLog {
        entry_column: entry_column.to_string(),
        exit_column: exit_column.to_string(),
        extra_columns,
        trades,
    })
}

/// pandas writes its row index as a blank or `Unnamed: 0` header.
fn is_index_column(header: &str) -> bool {
    header.is_empty() || header.starts_with("Unnamed:")
}

fn parse_price(value: Option<&str>, row: usize, column: &str) -> Result<f64, MalformedInput> {
    let raw = value.unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(MalformedInput::InvalidPrice {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LOG: &str = "\
,Symbol,Entry Price,Exit Price,Entry Date
0,BHP,100.0,110.0,2024-01-15
1,CBA,100.0,90.0,2024-01-16
2,WBC,50.0,70.0,
";

    fn parse(content: &str) -> Result<TradeLog, TradelogError> {
        parse_trade_log(content.as_bytes(), "test.csv", "Entry Price", "Exit Price")
    }

    fn malformed_kind(result: Result<TradeLog, TradelogError>) -> MalformedInput {
        match result {
            Err(TradelogError::MalformedInput { kind, .. }) => kind,
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn parses_prices_in_order() {
        let log = parse(LOG).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log.trades[0].entry_price, 100.0);
        assert_eq!(log.trades[0].exit_price, 110.0);
        assert_eq!(log.trades[1].exit_price, 90.0);
        assert_eq!(log.trades[2].entry_price, 50.0);
    }

    #[test]
    fn drops_index_column_and_keeps_extras() {
        let log = parse(LOG).unwrap();
        assert_eq!(log.extra_columns, vec!["Symbol", "Entry Date"]);
        assert_eq!(log.trades[0].extra, vec!["BHP", "2024-01-15"]);
        assert_eq!(log.trades[2].extra, vec!["WBC", ""]);
    }

    #[test]
    fn drops_pandas_unnamed_column() {
        let log = parse("Unnamed: 0,Entry Price,Exit Price\n0,1.5,2.5\n").unwrap();
        assert!(log.extra_columns.is_empty());
        assert_eq!(log.trades[0].exit_price, 2.5);
    }

    #[test]
    fn trims_whitespace() {
        let log = parse("Entry Price , Exit Price\n 10 , 12.5 \n").unwrap();
        assert_eq!(log.trades[0].entry_price, 10.0);
        assert_eq!(log.trades[0].exit_price, 12.5);
    }

    #[test]
    fn header_only_is_empty_log() {
        let log = parse("Entry Price,Exit Price\n").unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn missing_column_is_malformed() {
        let kind = malformed_kind(parse("Entry Price,Close\n1,2\n"));
        assert_eq!(
            kind,
            MalformedInput::MissingColumn {
                column: "Exit Price".into()
            }
        );
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let kind = malformed_kind(parse("Entry Price,Exit Price\n1,2\n3,abc\n"));
        assert_eq!(
            kind,
            MalformedInput::InvalidPrice {
                row: 2,
                column: "Exit Price".into(),
                value: "abc".into()
            }
        );
    }

    #[test]
    fn empty_and_non_finite_prices_are_malformed() {
        assert!(matches!(
            malformed_kind(parse("Entry Price,Exit Price\n,2\n")),
            MalformedInput::InvalidPrice { row: 1, .. }
        ));
        assert!(matches!(
            malformed_kind(parse("Entry Price,Exit Price\nNaN,2\n")),
            MalformedInput::InvalidPrice { .. }
        ));
        assert!(matches!(
            malformed_kind(parse("Entry Price,Exit Price\n1,inf\n")),
            MalformedInput::InvalidPrice { .. }
        ));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let kind = malformed_kind(parse("Entry Price,Exit Price\n1,2,3\n"));
        assert!(matches!(kind, MalformedInput::Csv { .. }));
    }

    #[test]
    fn custom_column_names() {
        let log = parse_trade_log("open,close\n5,6\n".as_bytes(), "t.csv", "open", "close").unwrap();
        assert_eq!(log.entry_column, "open");
        assert_eq!(log.trades[0].exit_price, 6.0);
    }

    #[test]
    fn adapter_loads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tradelog.csv");
        fs::write(&path, LOG).unwrap();

        let log = CsvTradeLogAdapter::new(path).load_trade_log().unwrap();
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn adapter_missing_file_is_io_error() {
        let adapter = CsvTradeLogAdapter::new(PathBuf::from("/nonexistent/tradelog.csv"));
        let err = adapter.load_trade_log().unwrap_err();
        assert!(matches!(err, TradelogError::Io(_)));
        assert!(err.to_string().contains("/nonexistent/tradelog.csv"));
    }
}
