use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No candles available")]
    NoData,
}
