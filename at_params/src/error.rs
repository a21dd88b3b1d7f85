use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Rejected parameter input. Nothing is applied when this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidField { field: &'static str, value: Value, reason: &'static str },

    #[error("rsi_buy ({rsi_buy}) must be lower than rsi_sell ({rsi_sell})")]
    RsiOrder { rsi_buy: u32, rsi_sell: u32 },

    #[error("Parameters must be a JSON object, got: {0}")]
    NotAnObject(Value),
}

impl ValidationError {
    /// Name of the offending field, if a single field is responsible
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::InvalidField { field, .. } => Some(*field),
            ValidationError::RsiOrder { .. } => Some(crate::params::RSI_BUY),
            ValidationError::NotAnObject(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io { path, source }
    }
}
