use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::Candle;
use crate::StrategyError;

/// Load OHLCV candles from a CSV file
///
/// Expected header: `timestamp_ms,open,high,low,close,volume`, oldest row first.
pub fn load_candles_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Candle>, StrategyError> {
    let file = File::open(path.as_ref())?;
    let mut reader = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(file);

    let mut candles = Vec::new();
    for result in reader.deserialize() {
        let candle: Candle = result?;
        candles.push(candle);
    }

    if candles.is_empty() {
        return Err(StrategyError::NoData);
    }

    debug!("Loaded {} candles from {}", candles.len(), path.as_ref().display());
    Ok(candles)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_candles() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp_ms,open,high,low,close,volume").unwrap();
        writeln!(file, "1700000000000, 100.0, 101.0, 99.5, 100.5, 12.0").unwrap();
        writeln!(file, "1700000900000, 100.5, 102.0, 100.0, 101.5, 0").unwrap();

        let candles = load_candles_csv(file.path()).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp_ms, 1_700_000_000_000);
        assert_eq!(candles[1].close, 101.5);
        assert_eq!(candles[1].volume, 0.0);
    }

    #[test]
    fn test_empty_file_is_no_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp_ms,open,high,low,close,volume").unwrap();

        assert!(matches!(load_candles_csv(file.path()), Err(StrategyError::NoData)));
    }

    #[test]
    fn test_bad_row_is_csv_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp_ms,open,high,low,close,volume").unwrap();
        writeln!(file, "yesterday,1,1,1,1,1").unwrap();

        assert!(matches!(load_candles_csv(file.path()), Err(StrategyError::Csv(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(load_candles_csv("/nonexistent/candles.csv"), Err(StrategyError::Io(_))));
    }
}
