//! Chat text for engine status and command results

use std::fmt::Write;

use at_http::ApiError;
use at_http::FreqtradeClient;
use at_http::models::Balance;
use at_http::models::CommandAck;
use at_http::models::DailyProfit;
use at_http::models::OpenTrade;
use at_http::models::ShowConfig;
use at_params::ParameterSet;
use tracing::warn;

use crate::editor::EditOutcome;
use crate::session::EditableField;

/// Engine snapshot; each section fails independently
#[derive(Debug)]
pub struct Overview {
    pub config: at_http::Result<ShowConfig>,
    pub balance: at_http::Result<Balance>,
    pub daily: at_http::Result<DailyProfit>,
    pub trades: at_http::Result<Vec<OpenTrade>>,
}

pub async fn fetch_overview(api: &FreqtradeClient) -> Overview {
    let (config, balance, daily, trades) = tokio::join!(api.show_config(), api.balance(), api.daily(), api.open_trades());

    for (section, err) in [
        ("show_config", config.as_ref().err()),
        ("balance", balance.as_ref().err()),
        ("daily", daily.as_ref().err()),
        ("status", trades.as_ref().err()),
    ] {
        if let Some(err) = err {
            warn!(section, error = %err, "Status query failed");
        }
    }

    Overview { config, balance, daily, trades }
}

fn unavailable(err: &ApiError) -> &'static str {
    if err.is_auth_failure() { "authentication failed" } else { "unavailable" }
}

pub fn render_overview(overview: &Overview) -> String {
    let errors = [
        overview.config.as_ref().err(),
        overview.balance.as_ref().err(),
        overview.daily.as_ref().err(),
        overview.trades.as_ref().err(),
    ];
    if errors.iter().all(Option::is_some) {
        return if errors.iter().flatten().any(|err| err.is_auth_failure()) {
            "🔒 Authentication failed\nThe trading engine rejected the API credentials.".to_string()
        } else {
            "⚠️ Connection error\nCould not get data from the trading engine API.".to_string()
        };
    }

    let mut text = String::from("📊 Engine status\n\n");

    match &overview.config {
        Ok(config) => {
            let _ = writeln!(text, "🤖 State: {}", config.state);
            let _ = writeln!(text, "🧠 Strategy: {}", config.strategy.as_deref().unwrap_or("n/a"));
            let _ = writeln!(
                text,
                "💱 Stake: {}{}",
                config.stake_currency.as_deref().unwrap_or("n/a"),
                if config.dry_run { " (dry run)" } else { "" }
            );
        }
        Err(err) => {
            let _ = writeln!(text, "🤖 State: {}", unavailable(err));
        }
    }

    match &overview.balance {
        Ok(balance) => {
            let _ = writeln!(text, "💰 Balance: {:.2} {}", balance.total, balance.stake);
        }
        Err(err) => {
            let _ = writeln!(text, "💰 Balance: {}", unavailable(err));
        }
    }

    match &overview.daily {
        Ok(daily) => match daily.today() {
            Some(today) => {
                let _ = writeln!(
                    text,
                    "📅 Today ({}): {:+.2} {}, {} trades",
                    today.date, today.abs_profit, daily.stake_currency, today.trade_count
                );
            }
            None => {
                let _ = writeln!(text, "📅 Today: no data");
            }
        },
        Err(err) => {
            let _ = writeln!(text, "📅 Today: {}", unavailable(err));
        }
    }

    match &overview.trades {
        Ok(trades) if trades.is_empty() => {
            let _ = write!(text, "📈 Open trades: none");
        }
        Ok(trades) => {
            let _ = write!(text, "📈 Open trades ({}):", trades.len());
            for trade in trades {
                let profit = trade.profit_ratio.map(|ratio| format!("{:+.2}%", ratio * 100.0)).unwrap_or_else(|| "n/a".to_string());
                let _ = write!(text, "\n  #{} {} {}", trade.trade_id, trade.pair, profit);
            }
        }
        Err(err) => {
            let _ = write!(text, "📈 Open trades: {}", unavailable(err));
        }
    }

    text
}

/// Result of a start/stop request
pub fn render_command(action: &str, result: &at_http::Result<CommandAck>) -> String {
    match result {
        Ok(ack) => format!("✅ {action}: {}", ack.status),
        Err(err) => format!("❌ {action} failed: {}", unavailable(err)),
    }
}

pub fn render_reload(acknowledged: bool) -> String {
    if acknowledged {
        "🔄 Config reload requested, the engine acknowledged it.".to_string()
    } else {
        "⚠️ The engine did not acknowledge the config reload.".to_string()
    }
}

pub fn render_settings(params: &ParameterSet) -> String {
    format!("⚙️ Strategy parameters\n\n{params}\n\nPick a value to edit:")
}

pub fn render_edit_outcome(field: EditableField, outcome: &EditOutcome) -> String {
    let params = outcome.params();
    let value = match field {
        EditableField::RsiBuy => params.rsi_buy.to_string(),
        EditableField::Stoploss => format!("{:.2}%", params.stoploss * 100.0),
    };
    match outcome {
        EditOutcome::Applied(_) => format!("✅ {} set to {value} and applied.", field.label()),
        EditOutcome::SavedNotApplied(_) => {
            format!("⚠️ {} set to {value}: saved but not applied. The engine did not confirm the reload; use /reload to retry.", field.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unauthorized(endpoint: &str) -> ApiError {
        ApiError::Unauthorized { endpoint: endpoint.to_string() }
    }

    fn down() -> ApiError {
        ApiError::InvalidResponse("connection refused".to_string())
    }

    fn healthy() -> Overview {
        Overview {
            config: Ok(serde_json::from_str(r#"{"state": "running", "strategy": "AiotradeStrategy", "stake_currency": "USDT", "dry_run": true}"#).unwrap()),
            balance: Ok(serde_json::from_str(r#"{"total": 1012.5, "stake": "USDT"}"#).unwrap()),
            daily: Ok(serde_json::from_str(
                r#"{"data": [{"date": "2025-03-02", "abs_profit": 1.5, "trade_count": 3}], "stake_currency": "USDT"}"#,
            )
            .unwrap()),
            trades: Ok(serde_json::from_str(
                r#"[{"trade_id": 7, "pair": "BTC/USDT", "open_rate": 60000.0, "profit_ratio": 0.012, "stake_amount": 100.0}]"#,
            )
            .unwrap()),
        }
    }

    #[test]
    fn test_full_overview() {
        let text = render_overview(&healthy());
        assert!(text.contains("State: running"));
        assert!(text.contains("Strategy: AiotradeStrategy"));
        assert!(text.contains("USDT (dry run)"));
        assert!(text.contains("Balance: 1012.50 USDT"));
        assert!(text.contains("Today (2025-03-02): +1.50 USDT, 3 trades"));
        assert!(text.contains("#7 BTC/USDT +1.20%"));
    }

    #[test]
    fn test_unauthorized_renders_auth_failure() {
        let overview = Overview {
            config: Err(unauthorized("show_config")),
            balance: Err(unauthorized("balance")),
            daily: Err(unauthorized("daily")),
            trades: Err(unauthorized("status")),
        };
        assert!(render_overview(&overview).contains("Authentication failed"));
    }

    #[test]
    fn test_engine_down() {
        let overview = Overview { config: Err(down()), balance: Err(down()), daily: Err(down()), trades: Err(down()) };
        assert!(render_overview(&overview).contains("Connection error"));
    }

    #[test]
    fn test_sections_fall_back_independently() {
        let overview = Overview { balance: Err(down()), trades: Err(unauthorized("status")), ..healthy() };
        let text = render_overview(&overview);
        assert!(text.contains("State: running"));
        assert!(text.contains("Balance: unavailable"));
        assert!(text.contains("Open trades: authentication failed"));
    }

    #[test]
    fn test_command_results() {
        let ack = serde_json::from_str(r#"{"status": "starting trader ..."}"#).unwrap();
        assert_eq!(render_command("Start", &Ok(ack)), "✅ Start: starting trader ...");
        assert_eq!(render_command("Stop", &Err(unauthorized("stop"))), "❌ Stop failed: authentication failed");
    }

    #[test]
    fn test_edit_outcome_messages() {
        let params = ParameterSet { rsi_buy: 40, ..ParameterSet::default() };
        assert!(render_edit_outcome(EditableField::RsiBuy, &EditOutcome::Applied(params)).contains("RSI buy threshold set to 40 and applied"));
        assert!(render_edit_outcome(EditableField::RsiBuy, &EditOutcome::SavedNotApplied(params)).contains("saved but not applied"));
        assert!(render_edit_outcome(EditableField::Stoploss, &EditOutcome::Applied(params)).contains("-10.00%"));
    }
}
