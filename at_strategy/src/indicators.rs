//! Indicator series aligned with their input; `None` marks the warm-up window.

use crate::EMA;

/// Exponential moving average of `values`
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut ema = EMA::new(period);
    values
        .iter()
        .map(|&value| {
            ema.update(value);
            ema.is_initialized().then(|| ema.value())
        })
        .collect()
}

/// Relative Strength Index with Wilder smoothing
///
/// The first value appears at index `period`.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    let period = period.max(1);
    if closes.len() <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        avg_gain += change.max(0.0);
        avg_loss += (-change).max(0.0);
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    let n = period as f64;
    for i in period + 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (n - 1.0) + change.max(0.0)) / n;
        avg_loss = (avg_loss * (n - 1.0) + (-change).max(0.0)) / n;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // Flat series sits in the middle
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("indicator not warmed up");
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_ema_series() {
        let series = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert_close(series[2], 2.0);
        assert_close(series[3], 3.0);
        assert_close(series[4], 4.0);
    }

    #[test]
    fn test_ema_shorter_than_period() {
        assert!(ema(&[1.0, 2.0], 5).iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        let series = rsi(&[1.0, 2.0, 1.0, 2.0, 1.0], 2);
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert_close(series[2], 50.0);
        assert_close(series[3], 75.0);
        assert_close(series[4], 37.5);
    }

    #[test]
    fn test_rsi_monotonic_series() {
        let rising: Vec<f64> = (0..30).map(f64::from).collect();
        assert_close(rsi(&rising, 14)[29], 100.0);

        let falling: Vec<f64> = (0..30).rev().map(f64::from).collect();
        assert_close(rsi(&falling, 14)[29], 0.0);
    }

    #[test]
    fn test_rsi_flat_series() {
        assert_close(rsi(&[5.0; 20], 14)[19], 50.0);
    }

    #[test]
    fn test_rsi_needs_period_plus_one_values() {
        assert!(rsi(&[1.0; 14], 14).iter().all(Option::is_none));
        assert!(rsi(&[1.0; 15], 14)[14].is_some());
    }

    #[test]
    fn test_rsi_bounded() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + (f64::from(i) * 0.7).sin() * 10.0).collect();
        for value in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
