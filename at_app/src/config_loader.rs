use std::path::Path;
use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::File;
use serde::Deserialize;

/// Strategy runner settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// OHLCV history, rewritten by the data feed
    pub candles_path: PathBuf,
    /// Directory holding `strategy_params.json`
    pub user_data_dir: PathBuf,
    pub poll_interval_secs: u64,
    pub timeframe: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            candles_path: PathBuf::from("user_data/data/candles.csv"),
            user_data_dir: PathBuf::from("user_data"),
            poll_interval_secs: 60,
            timeframe: "15m".to_string(),
        }
    }
}

pub fn load_runner_config<P: AsRef<Path>>(path: P) -> Result<RunnerConfig, ConfigError> {
    let config = Config::builder().add_source(File::from(path.as_ref())).build()?;

    config.try_deserialize()
}

/// Load runner config with fallback to default
pub fn load_runner_config_or_default(path: &str) -> RunnerConfig {
    match load_runner_config(path) {
        Ok(config) => {
            tracing::info!("Loaded runner config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load runner config from {}: {}. Using defaults.", path, err);
            RunnerConfig::default()
        }
    }
}
