use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

pub const RSI_PERIOD: &str = "rsi_period";
pub const RSI_BUY: &str = "rsi_buy";
pub const RSI_SELL: &str = "rsi_sell";
pub const STOPLOSS: &str = "stoploss";
pub const TRAILING_STOP: &str = "trailing_stop";
pub const TRAILING_STOP_POSITIVE: &str = "trailing_stop_positive";
pub const TRAILING_STOP_POSITIVE_OFFSET: &str = "trailing_stop_positive_offset";

/// Every key of the parameter file, in file order
pub const ALL_KEYS: [&str; 7] =
    [RSI_PERIOD, RSI_BUY, RSI_SELL, STOPLOSS, TRAILING_STOP, TRAILING_STOP_POSITIVE, TRAILING_STOP_POSITIVE_OFFSET];

/// Dynamic strategy parameters
///
/// Instances are only produced by [`crate::validate`] or [`Default`], so every
/// field is always inside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSet {
    /// RSI lookback length, [2, 100]
    pub rsi_period: u32,

    /// Enter long below this RSI level, [1, 99]
    pub rsi_buy: u32,

    /// Exit above this RSI level, [1, 99]
    pub rsi_sell: u32,

    /// Maximum tolerated fractional loss, (-1.0, 0.0]
    pub stoploss: f64,

    pub trailing_stop: bool,

    /// Trailing distance once the offset is reached, >= 0
    pub trailing_stop_positive: f64,

    /// Profit required before the positive trailing stop activates, >= 0
    pub trailing_stop_positive_offset: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_buy: 30,
            rsi_sell: 70,
            stoploss: -0.10,
            trailing_stop: true,
            trailing_stop_positive: 0.01,
            trailing_stop_positive_offset: 0.02,
        }
    }
}

impl ParameterSet {
    /// Untyped key/value form, as accepted by [`crate::validate`]
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert(RSI_PERIOD.to_string(), Value::from(self.rsi_period));
        raw.insert(RSI_BUY.to_string(), Value::from(self.rsi_buy));
        raw.insert(RSI_SELL.to_string(), Value::from(self.rsi_sell));
        raw.insert(STOPLOSS.to_string(), Value::from(self.stoploss));
        raw.insert(TRAILING_STOP.to_string(), Value::from(self.trailing_stop));
        raw.insert(TRAILING_STOP_POSITIVE.to_string(), Value::from(self.trailing_stop_positive));
        raw.insert(TRAILING_STOP_POSITIVE_OFFSET.to_string(), Value::from(self.trailing_stop_positive_offset));
        raw
    }
}

impl std::fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "RSI period: {}", self.rsi_period)?;
        writeln!(f, "RSI buy: {}", self.rsi_buy)?;
        writeln!(f, "RSI sell: {}", self.rsi_sell)?;
        writeln!(f, "Stoploss: {:.2}%", self.stoploss * 100.0)?;
        writeln!(f, "Trailing stop: {}", if self.trailing_stop { "on" } else { "off" })?;
        writeln!(f, "Trailing positive: {:.2}%", self.trailing_stop_positive * 100.0)?;
        write!(f, "Trailing offset: {:.2}%", self.trailing_stop_positive_offset * 100.0)
    }
}
