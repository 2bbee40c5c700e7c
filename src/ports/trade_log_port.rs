//! Trade log access port trait.

use crate::domain::error::TradelogError;
use crate::domain::trade::TradeLog;

pub trait TradeLogPort {
    /// Load every trade in chronological order. Any malformed row fails the
    /// whole load.
    fn load_trade_log(&self) -> Result<TradeLog, TradelogError>;
}
