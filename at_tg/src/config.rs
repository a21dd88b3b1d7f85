use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ADMIN_ID: &str = "ADMIN_ID";
pub const FREQTRADE_API_URL: &str = "FREQTRADE_API_URL";
pub const FREQTRADE_API_USERNAME: &str = "FREQTRADE_API_USERNAME";
pub const FREQTRADE_API_PASSWORD: &str = "FREQTRADE_API_PASSWORD";
pub const STRATEGY_PARAMS_PATH: &str = "STRATEGY_PARAMS_PATH";
pub const EDIT_SESSION_TIMEOUT_SECS: &str = "EDIT_SESSION_TIMEOUT_SECS";

pub const DEFAULT_PARAMS_PATH: &str = "/app/shared_data/strategy_params.json";
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} missing in environment")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid { name: &'static str, expected: &'static str, value: String },
}

/// Bot settings, read once at startup
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub admin_id: u64,
    pub api_url: String,
    pub api_username: String,
    pub api_password: String,
    pub params_path: PathBuf,
    pub session_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let admin_raw = required(ADMIN_ID)?;
        let admin_id = admin_raw
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { name: ADMIN_ID, expected: "a numeric Telegram user id", value: admin_raw.clone() })?;

        let api_url = required(FREQTRADE_API_URL)?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { name: FREQTRADE_API_URL, expected: "an http(s) URL", value: api_url });
        }

        let session_timeout = match get(EDIT_SESSION_TIMEOUT_SECS) {
            None => DEFAULT_SESSION_TIMEOUT,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid { name: EDIT_SESSION_TIMEOUT_SECS, expected: "a positive number of seconds", value: raw }),
            },
        };

        Ok(Self {
            bot_token: required(TELEGRAM_BOT_TOKEN)?,
            admin_id,
            api_url,
            api_username: required(FREQTRADE_API_USERNAME)?,
            api_password: required(FREQTRADE_API_PASSWORD)?,
            params_path: get(STRATEGY_PARAMS_PATH).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMS_PATH)),
            session_timeout,
        })
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"***")
            .field("admin_id", &self.admin_id)
            .field("api_url", &self.api_url)
            .field("api_username", &self.api_username)
            .field("api_password", &"***")
            .field("params_path", &self.params_path)
            .field("session_timeout", &self.session_timeout)
            .finish()
    }
}
