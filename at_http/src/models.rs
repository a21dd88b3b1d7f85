//! Response types of the trading engine REST API
//!
//! Only `ShowConfig::state` and `CommandAck::status` are required; everything
//! else defaults so that older or newer engine versions still deserialize.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ShowConfig {
    /// running, stopped or paused
    pub state: String,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub stake_currency: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub currencies: Vec<CurrencyBalance>,
    pub total: f64,
    pub symbol: String,
    pub value: f64,
    pub stake: String,
    pub starting_capital: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrencyBalance {
    pub currency: String,
    pub free: f64,
    pub balance: f64,
    pub used: f64,
    pub est_stake: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyProfit {
    pub data: Vec<DailyRecord>,
    pub stake_currency: String,
    pub fiat_display_currency: String,
}

impl DailyProfit {
    /// Most recent day; the engine lists days newest first
    pub fn today(&self) -> Option<&DailyRecord> {
        self.data.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyRecord {
    pub date: String,
    pub abs_profit: f64,
    pub fiat_value: f64,
    pub trade_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenTrade {
    pub trade_id: u64,
    pub pair: String,
    pub open_rate: f64,
    pub current_rate: Option<f64>,
    pub profit_ratio: Option<f64>,
    pub profit_abs: Option<f64>,
    pub stake_amount: f64,
}

/// Acknowledgement body of the POST control endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct CommandAck {
    pub status: String,
}
