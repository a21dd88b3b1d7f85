use std::sync::Arc;

use at_http::ApiCredentials;
use at_http::FreqtradeClient;
use at_params::ParamStore;
use at_tg::AdminGuard;
use at_tg::BotConfig;
use at_tg::BotContext;
use at_tg::Command;
use at_tg::EditState;
use at_tg::ParamEditor;
use at_tg::schema;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let guard = at_app::tracing_setup::init_from_env("telegram_bot", Level::INFO);

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Configuration error: {err}");
            eprintln!("Configuration error: {err}");
            drop(guard);
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "Configuration loaded");

    let api = FreqtradeClient::new(&config.api_url, ApiCredentials::new(config.api_username.clone(), config.api_password.clone()))?;
    let store = Arc::new(ParamStore::new(config.params_path.clone()));
    let ctx = Arc::new(BotContext { editor: ParamEditor::new(store, api.clone()), api, session_timeout: config.session_timeout });

    let bot = Bot::new(&config.bot_token);
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {err}");
    }
    tracing::info!(admin_id = config.admin_id, "Telegram bot initialised");

    tracing::info!("Starting Telegram bot dispatcher...");
    Dispatcher::builder(bot, schema(AdminGuard::new(config.admin_id)))
        .dependencies(dptree::deps![InMemStorage::<EditState>::new(), ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Telegram bot stopped");
    Ok(())
}
