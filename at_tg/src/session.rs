//! Two-step parameter edit: a menu button arms the session, the next text message carries the value.

use std::time::Duration;
use std::time::Instant;

use at_params::params;
use serde_json::Value;

/// Parameters editable from the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    RsiBuy,
    Stoploss,
}

impl EditableField {
    /// Key in the persisted parameter object
    pub const fn key(self) -> &'static str {
        match self {
            EditableField::RsiBuy => params::RSI_BUY,
            EditableField::Stoploss => params::STOPLOSS,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EditableField::RsiBuy => "RSI buy threshold",
            EditableField::Stoploss => "Stoploss",
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            EditableField::RsiBuy => "Send the new RSI buy threshold: a whole number between 1 and 99, below the RSI sell level.",
            EditableField::Stoploss => "Send the new stoploss as a negative fraction, e.g. -0.05 for 5% (or -5%).",
        }
    }

    /// Turn chat text into a JSON value; domain checks happen in the validator
    pub fn parse(self, text: &str) -> Result<Value, String> {
        let text = text.trim();
        match self {
            EditableField::RsiBuy => text.parse::<i64>().map(Value::from).map_err(|_| format!("'{text}' is not a whole number.")),
            EditableField::Stoploss => {
                let normalized = text.replace(',', ".");
                let (number, scale) = match normalized.strip_suffix('%') {
                    Some(percent) => (percent.trim().to_string(), 100.0),
                    None => (normalized, 1.0),
                };
                match number.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Value::from(value / scale)),
                    _ => Err(format!("'{text}' is not a number.")),
                }
            }
        }
    }
}

/// Per-chat dialogue state
#[derive(Debug, Clone, Default)]
pub enum EditState {
    #[default]
    Idle,
    AwaitingValue { field: EditableField, since: Instant },
}

impl EditState {
    pub fn awaiting(field: EditableField) -> Self {
        EditState::AwaitingValue { field, since: Instant::now() }
    }

    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        match self {
            EditState::Idle => false,
            EditState::AwaitingValue { since, .. } => now.saturating_duration_since(*since) >= timeout,
        }
    }
}

/// What an incoming text message means for the current session
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// No edit in progress
    Ignored,
    /// The session timed out and returns to idle
    Expired,
    /// Unparseable input; keep waiting for a value
    Rejected { field: EditableField, reason: String },
    /// Hand the value to the editor
    Submit { field: EditableField, value: Value },
}

pub fn on_text(state: &EditState, text: &str, now: Instant, timeout: Duration) -> Step {
    let EditState::AwaitingValue { field, .. } = state else {
        return Step::Ignored;
    };

    if state.is_expired(now, timeout) {
        return Step::Expired;
    }

    match field.parse(text) {
        Ok(value) => Step::Submit { field: *field, value },
        Err(reason) => Step::Rejected { field: *field, reason },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(300);

    #[test]
    fn test_idle_ignores_text() {
        assert_eq!(on_text(&EditState::Idle, "40", Instant::now(), TIMEOUT), Step::Ignored);
        assert!(!EditState::Idle.is_expired(Instant::now(), Duration::ZERO));
    }

    #[test]
    fn test_rsi_value_submitted() {
        let state = EditState::awaiting(EditableField::RsiBuy);
        assert_eq!(on_text(&state, " 40 ", Instant::now(), TIMEOUT), Step::Submit { field: EditableField::RsiBuy, value: json!(40) });
    }

    #[test]
    fn test_garbage_keeps_waiting() {
        let state = EditState::awaiting(EditableField::RsiBuy);
        assert!(matches!(on_text(&state, "forty", Instant::now(), TIMEOUT), Step::Rejected { field: EditableField::RsiBuy, .. }));
        assert!(matches!(on_text(&state, "40.5", Instant::now(), TIMEOUT), Step::Rejected { .. }));
    }

    #[test]
    fn test_session_expires() {
        let state = EditState::awaiting(EditableField::Stoploss);
        let later = Instant::now() + TIMEOUT + Duration::from_secs(1);
        assert_eq!(on_text(&state, "-0.05", later, TIMEOUT), Step::Expired);
    }

    #[test]
    fn test_stoploss_formats() {
        let field = EditableField::Stoploss;
        assert_eq!(field.parse("-0.05").unwrap(), json!(-0.05));
        assert_eq!(field.parse("-0,05").unwrap(), json!(-0.05));
        assert_eq!(field.parse("-5%").unwrap(), json!(-0.05));
        assert!(field.parse("NaN").is_err());
        assert!(field.parse("").is_err());
    }

    #[test]
    fn test_out_of_domain_still_parses() {
        // Range checks belong to the validator
        assert_eq!(EditableField::RsiBuy.parse("150").unwrap(), json!(150));
        assert_eq!(EditableField::Stoploss.parse("0.5").unwrap(), json!(0.5));
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(EditableField::RsiBuy.key(), "rsi_buy");
        assert_eq!(EditableField::Stoploss.key(), "stoploss");
    }
}
