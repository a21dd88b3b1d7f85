pub mod error;
pub mod indicators;
pub mod loader;
pub mod strategy;

pub use at_params::ParamStore;
pub use at_params::ParameterSet;
pub use error::StrategyError;
pub use strategy::AiotradeStrategy;
pub use strategy::Indicators;
pub use strategy::RiskSettings;
pub use strategy::Strategy;

/// OHLCV candle
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct Candle {
    /// Open time, milliseconds since epoch
    pub timestamp_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Per-candle strategy decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Hold,
    EnterLong,
    ExitLong,
}

/// Smoothing factor of a period-based EMA
pub fn ema_alpha_from_period(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Exponential moving average, seeded with the SMA of the first `period` samples
#[derive(Debug, Clone)]
pub struct EMA {
    value: f64,
    alpha: f64,
    period: usize,
    seen: usize,
    seed_sum: f64,
}

impl EMA {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self { value: 0.0, alpha: ema_alpha_from_period(period), period, seen: 0, seed_sum: 0.0 }
    }

    pub fn update(&mut self, new_value: f64) {
        if self.seen < self.period {
            self.seed_sum += new_value;
            self.seen += 1;
            if self.seen == self.period {
                self.value = self.seed_sum / self.period as f64;
            }
        } else {
            self.value = self.alpha * new_value + (1.0 - self.alpha) * self.value;
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// True once `period` samples have been seen
    pub fn is_initialized(&self) -> bool {
        self.seen >= self.period
    }
}
