use serde_json::Map;
use serde_json::Value;

use crate::error::ValidationError;
use crate::params::ParameterSet;
use crate::params::RSI_BUY;
use crate::params::RSI_PERIOD;
use crate::params::RSI_SELL;
use crate::params::STOPLOSS;
use crate::params::TRAILING_STOP;
use crate::params::TRAILING_STOP_POSITIVE;
use crate::params::TRAILING_STOP_POSITIVE_OFFSET;

/// Validate an untyped parameter map
///
/// Missing keys take their default, unknown keys are ignored. The first field
/// outside its domain fails the whole call.
pub fn validate(raw: &Map<String, Value>) -> Result<ParameterSet, ValidationError> {
    let defaults = ParameterSet::default();

    let params = ParameterSet {
        rsi_period: int_field(raw, RSI_PERIOD, defaults.rsi_period, 2, 100)?,
        rsi_buy: int_field(raw, RSI_BUY, defaults.rsi_buy, 1, 99)?,
        rsi_sell: int_field(raw, RSI_SELL, defaults.rsi_sell, 1, 99)?,
        stoploss: float_field(raw, STOPLOSS, defaults.stoploss, |v| v > -1.0 && v <= 0.0, "must be in (-1.0, 0.0]")?,
        trailing_stop: bool_field(raw, TRAILING_STOP, defaults.trailing_stop)?,
        trailing_stop_positive: float_field(raw, TRAILING_STOP_POSITIVE, defaults.trailing_stop_positive, |v| v >= 0.0, "must be >= 0")?,
        trailing_stop_positive_offset: float_field(
            raw,
            TRAILING_STOP_POSITIVE_OFFSET,
            defaults.trailing_stop_positive_offset,
            |v| v >= 0.0,
            "must be >= 0",
        )?,
    };

    if params.rsi_buy >= params.rsi_sell {
        return Err(ValidationError::RsiOrder { rsi_buy: params.rsi_buy, rsi_sell: params.rsi_sell });
    }

    Ok(params)
}

/// Validate a parsed JSON document; anything but an object is rejected
pub fn validate_value(raw: &Value) -> Result<ParameterSet, ValidationError> {
    match raw {
        Value::Object(map) => validate(map),
        other => Err(ValidationError::NotAnObject(other.clone())),
    }
}

fn int_field(raw: &Map<String, Value>, field: &'static str, default: u32, min: u32, max: u32) -> Result<u32, ValidationError> {
    let Some(value) = raw.get(field) else {
        return Ok(default);
    };

    let invalid = |reason| ValidationError::InvalidField { field, value: value.clone(), reason };

    // Integral floats such as 40.0 are accepted
    let number = match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int
            } else {
                match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => float as i64,
                    _ => return Err(invalid("expected an integer")),
                }
            }
        }
        _ => return Err(invalid("expected an integer")),
    };

    if number < i64::from(min) || number > i64::from(max) {
        return Err(invalid(range_reason(field)));
    }

    Ok(number as u32)
}

fn float_field(
    raw: &Map<String, Value>,
    field: &'static str,
    default: f64,
    in_domain: impl Fn(f64) -> bool,
    reason: &'static str,
) -> Result<f64, ValidationError> {
    let Some(value) = raw.get(field) else {
        return Ok(default);
    };

    let number = value
        .as_f64()
        .ok_or_else(|| ValidationError::InvalidField { field, value: value.clone(), reason: "expected a number" })?;

    if !number.is_finite() || !in_domain(number) {
        return Err(ValidationError::InvalidField { field, value: value.clone(), reason });
    }

    Ok(number)
}

fn bool_field(raw: &Map<String, Value>, field: &'static str, default: bool) -> Result<bool, ValidationError> {
    match raw.get(field) {
        None => Ok(default),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(ValidationError::InvalidField { field, value: other.clone(), reason: "expected true or false" }),
    }
}

fn range_reason(field: &'static str) -> &'static str {
    match field {
        RSI_PERIOD => "must be between 2 and 100",
        _ => "must be between 1 and 99",
    }
}
