use teloxide::utils::command::BotCommands;

/// Telegram bot commands with type-safe parsing
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Trading controller commands:")]
pub enum Command {
    #[command(description = "Main menu")]
    Start,

    #[command(description = "Show the control menu")]
    Menu,

    #[command(description = "Engine state, balance, profit and open trades")]
    Status,

    #[command(description = "Reload the engine configuration")]
    Reload,

    #[command(description = "Show help message")]
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "aiotrade_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/menu", "aiotrade_bot").unwrap(), Command::Menu);
        assert_eq!(Command::parse("/status@aiotrade_bot", "aiotrade_bot").unwrap(), Command::Status);
        assert_eq!(Command::parse("/reload", "aiotrade_bot").unwrap(), Command::Reload);
        assert!(Command::parse("/rsi 40", "aiotrade_bot").is_err());
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let help = Command::descriptions().to_string();
        for name in ["/start", "/menu", "/status", "/reload", "/help"] {
            assert!(help.contains(name), "missing {name}");
        }
    }
}
