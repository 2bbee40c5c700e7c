//! Trade records and the loaded trade log.

/// One executed trade. Only the two prices are interpreted; every other
/// column of the source row rides along in `extra`, aligned with
/// [`TradeLog::extra_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub entry_price: f64,
    pub exit_price: f64,
    pub extra: Vec<String>,
}

impl TradeRecord {
    pub fn new(entry_price: f64, exit_price: f64) -> Self {
        Self {
            entry_price,
            exit_price,
            extra: Vec::new(),
        }
    }

    pub fn profit(&self) -> f64 {
        self.exit_price - self.entry_price
    }

    /// Strict: a break-even trade is not profitable.
    pub fn is_profitable(&self) -> bool {
        self.exit_price > self.entry_price
    }
}

/// Ordered trades plus the column layout they were read from. Row order is
/// chronological trade order.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLog {
    pub entry_column: String,
    pub exit_column: String,
    pub extra_columns: Vec<String>,
    pub trades: Vec<TradeRecord>,
}

impl TradeLog {
    pub fn new(trades: Vec<TradeRecord>) -> Self {
        Self {
            entry_column: "Entry Price".to_string(),
            exit_column: "Exit Price".to_string(),
            extra_columns: Vec::new(),
            trades,
        }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// All column names in display order: entry, exit, then extras.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.entry_column.as_str(), self.exit_column.as_str()];
        columns.extend(self.extra_columns.iter().map(String::as_str));
        columns
    }

    /// Row cells in [`columns`](Self::columns) order, prices formatted as read.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.trades
            .iter()
            .map(|t| {
                let mut row = vec![t.entry_price.to_string(), t.exit_price.to_string()];
                row.extend(t.extra.iter().cloned());
                row
            })
            .collect()
    }

    /// Count of empty cells per column. Price columns are always zero once a
    /// log has loaded, since an empty price is rejected.
    pub fn missing_values(&self) -> Vec<(String, usize)> {
        let mut counts = vec![
            (self.entry_column.clone(), 0),
            (self.exit_column.clone(), 0),
        ];
        for (i, name) in self.extra_columns.iter().enumerate() {
            let missing = self
                .trades
                .iter()
                .filter(|t| t.extra.get(i).is_none_or(|v| v.trim().is_empty()))
                .count();
            counts.push((name.clone(), missing));
        }
        counts
    }
}
