use at_params::ParamStore;
use at_params::ParameterSet;
use tracing::debug;
use tracing::info;

use crate::Candle;
use crate::Signal;
use crate::indicators;

/// Extension points the trading host calls into
pub trait Strategy {
    fn name(&self) -> &str;

    fn timeframe(&self) -> &str;

    /// Called once at the start of every host iteration
    fn bot_loop_start(&mut self) {}

    fn populate_indicators(&self, candles: &[Candle]) -> Indicators;

    fn populate_entry_trend(&self, candles: &[Candle], indicators: &Indicators) -> Vec<bool>;

    fn populate_exit_trend(&self, candles: &[Candle], indicators: &Indicators) -> Vec<bool>;

    /// One signal per candle; an exit wins over an entry on the same candle
    fn analyze(&self, candles: &[Candle]) -> Vec<Signal> {
        let indicators = self.populate_indicators(candles);
        let entries = self.populate_entry_trend(candles, &indicators);
        let exits = self.populate_exit_trend(candles, &indicators);

        entries
            .into_iter()
            .zip(exits)
            .map(|(enter, exit)| match (enter, exit) {
                (_, true) => Signal::ExitLong,
                (true, false) => Signal::EnterLong,
                (false, false) => Signal::Hold,
            })
            .collect()
    }
}

/// Indicator columns aligned with the candle slice
#[derive(Debug, Clone, Default)]
pub struct Indicators {
    pub rsi: Vec<Option<f64>>,
    pub ema_trend: Vec<Option<f64>>,
}

/// Exit settings the host applies to open trades
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSettings {
    pub stoploss: f64,
    pub trailing_stop: bool,
    pub trailing_stop_positive: f64,
    pub trailing_stop_positive_offset: f64,
}

impl From<&ParameterSet> for RiskSettings {
    fn from(params: &ParameterSet) -> Self {
        Self {
            stoploss: params.stoploss,
            trailing_stop: params.trailing_stop,
            trailing_stop_positive: params.trailing_stop_positive,
            trailing_stop_positive_offset: params.trailing_stop_positive_offset,
        }
    }
}

/// RSI mean-reversion entries gated by a long EMA trend filter
///
/// Parameters are re-read from the shared file whenever it changes, at the
/// start of each host iteration.
#[derive(Debug)]
pub struct AiotradeStrategy {
    store: ParamStore,
    params: ParameterSet,
    risk: RiskSettings,
}

impl AiotradeStrategy {
    pub const NAME: &'static str = "AiotradeStrategy";
    pub const VERSION: &'static str = "2.1";
    pub const TIMEFRAME: &'static str = "15m";
    pub const EMA_TREND_LENGTH: usize = 200;

    /// (minutes since entry, ROI) pairs; a 10000% target effectively disables ROI exits
    pub const MINIMAL_ROI: &'static [(u32, f64)] = &[(0, 100.0)];

    pub fn new(store: ParamStore) -> Self {
        let params = ParameterSet::default();
        Self { store, risk: RiskSettings::from(&params), params }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn risk(&self) -> RiskSettings {
        self.risk
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    /// Re-read parameters if the backing file changed; true when re-read
    pub fn refresh_params(&mut self) -> bool {
        let Some(params) = self.store.refresh() else {
            return false;
        };

        if params != self.params {
            info!(
                rsi_period = params.rsi_period,
                rsi_buy = params.rsi_buy,
                rsi_sell = params.rsi_sell,
                stoploss = params.stoploss,
                trailing_stop = params.trailing_stop,
                "Strategy params updated"
            );
        } else {
            debug!("Params file touched, values unchanged");
        }

        self.params = params;
        self.risk = RiskSettings::from(&params);
        true
    }
}

impl Strategy for AiotradeStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn timeframe(&self) -> &str {
        Self::TIMEFRAME
    }

    fn bot_loop_start(&mut self) {
        self.refresh_params();
    }

    fn populate_indicators(&self, candles: &[Candle]) -> Indicators {
        let closes: Vec<f64> = candles.iter().map(|candle| candle.close).collect();
        Indicators {
            rsi: indicators::rsi(&closes, self.params.rsi_period as usize),
            ema_trend: indicators::ema(&closes, Self::EMA_TREND_LENGTH),
        }
    }

    fn populate_entry_trend(&self, candles: &[Candle], indicators: &Indicators) -> Vec<bool> {
        let rsi_buy = f64::from(self.params.rsi_buy);
        candles
            .iter()
            .zip(indicators.rsi.iter().zip(&indicators.ema_trend))
            .map(|(candle, (rsi, ema))| match (rsi, ema) {
                (Some(rsi), Some(ema)) => *rsi < rsi_buy && candle.close > *ema && candle.volume > 0.0,
                _ => false,
            })
            .collect()
    }

    fn populate_exit_trend(&self, candles: &[Candle], indicators: &Indicators) -> Vec<bool> {
        let rsi_sell = f64::from(self.params.rsi_sell);
        candles
            .iter()
            .zip(&indicators.rsi)
            .map(|(candle, rsi)| rsi.is_some_and(|rsi| rsi > rsi_sell) && candle.volume > 0.0)
            .collect()
    }
}
