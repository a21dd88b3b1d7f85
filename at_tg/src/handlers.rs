use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use at_http::FreqtradeClient;
use at_http::ReloadNotifier;
use teloxide::dispatching::UpdateHandler;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::types::UserId;
use teloxide::utils::command::BotCommands;

use crate::auth::AdminGuard;
use crate::bot_commands::Command;
use crate::editor::EditError;
use crate::editor::EditOutcome;
use crate::editor::ParamEditor;
use crate::error_handling::edit_menu;
use crate::error_handling::send_with_retry;
use crate::keyboards::MenuAction;
use crate::keyboards::main_menu;
use crate::keyboards::settings_menu;
use crate::render;
use crate::session;
use crate::session::EditState;
use crate::session::EditableField;
use crate::session::Step;

pub type EditDialogue = Dialogue<EditState, InMemStorage<EditState>>;

const MENU_TEXT: &str = "🎛 Control menu";

/// Shared handler dependencies
pub struct BotContext {
    pub api: FreqtradeClient,
    pub editor: ParamEditor<FreqtradeClient>,
    pub session_timeout: Duration,
}

/// Update routing: admin filter, then commands, menu buttons and edit values
pub fn schema(admin: AdminGuard) -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<EditState>, EditState>()
        .branch(dptree::entry().filter_command::<Command>().endpoint(handle_command))
        .branch(dptree::endpoint(handle_text));

    let callbacks = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, InMemStorage<EditState>, EditState>()
        .endpoint(handle_callback);

    dptree::entry()
        .filter_map(|update: Update| update.from().map(|user| user.id))
        .filter(move |user_id: UserId| admin.is_authorized(&user_id))
        .branch(messages)
        .branch(callbacks)
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, dialogue: EditDialogue, ctx: Arc<BotContext>) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    tracing::info!(?cmd, %chat_id, "Command received");

    match cmd {
        Command::Start => {
            dialogue.exit().await?;
            send_with_retry(&bot, chat_id, format!("👋 Trading controller ready.\n\n{MENU_TEXT}"), Some(main_menu())).await?;
        }
        Command::Menu => {
            dialogue.exit().await?;
            send_with_retry(&bot, chat_id, MENU_TEXT, Some(main_menu())).await?;
        }
        Command::Status => {
            let overview = render::fetch_overview(&ctx.api).await;
            send_with_retry(&bot, chat_id, render::render_overview(&overview), Some(main_menu())).await?;
        }
        Command::Reload => {
            let acknowledged = ctx.api.notify().await;
            send_with_retry(&bot, chat_id, render::render_reload(acknowledged), None).await?;
        }
        Command::Help => {
            send_with_retry(&bot, chat_id, Command::descriptions().to_string(), None).await?;
        }
    }

    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, dialogue: EditDialogue, ctx: Arc<BotContext>) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(action) = q.data.as_deref().and_then(MenuAction::parse) else {
        tracing::warn!(data = ?q.data, "Unknown callback data");
        return Ok(());
    };
    let Some(message) = q.regular_message() else {
        tracing::debug!(?action, "Callback on an inaccessible message");
        return Ok(());
    };
    tracing::info!(?action, chat_id = %message.chat.id, "Menu action");

    match action {
        MenuAction::Status => {
            let overview = render::fetch_overview(&ctx.api).await;
            edit_menu(&bot, message, render::render_overview(&overview), main_menu()).await?;
        }
        MenuAction::Start => {
            let result = ctx.api.start().await;
            if let Err(err) = &result {
                tracing::error!("Failed to start trading: {err}");
            }
            edit_menu(&bot, message, render::render_command("Start", &result), main_menu()).await?;
        }
        MenuAction::Stop => {
            let result = ctx.api.stop().await;
            if let Err(err) = &result {
                tracing::error!("Failed to stop trading: {err}");
            }
            edit_menu(&bot, message, render::render_command("Stop", &result), main_menu()).await?;
        }
        MenuAction::Settings => {
            dialogue.exit().await?;
            let params = ctx.editor.current().await?;
            edit_menu(&bot, message, render::render_settings(&params), settings_menu()).await?;
        }
        MenuAction::MainMenu => {
            dialogue.exit().await?;
            edit_menu(&bot, message, MENU_TEXT, main_menu()).await?;
        }
        MenuAction::EditRsi | MenuAction::EditStoploss => {
            let field = if action == MenuAction::EditRsi { EditableField::RsiBuy } else { EditableField::Stoploss };
            dialogue.update(EditState::awaiting(field)).await?;
            send_with_retry(&bot, message.chat.id, field.prompt(), None).await?;
        }
    }

    Ok(())
}

async fn handle_text(bot: Bot, msg: Message, dialogue: EditDialogue, state: EditState, ctx: Arc<BotContext>) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let step = session::on_text(&state, text, Instant::now(), ctx.session_timeout);
    let mut reply = step_reply(&step);

    if let Step::Submit { field, value } = step {
        send_with_retry(&bot, chat_id, reply.text, None).await?;
        let result = ctx.editor.apply(field.key(), value).await;
        match &result {
            Ok(_) => {}
            Err(EditError::Invalid(err)) => tracing::info!(field = field.key(), error = %err, "Rejected parameter value"),
            Err(err) => tracing::error!(field = field.key(), "Failed to apply parameter edit: {err}"),
        }
        reply = edit_reply(field, &result);
    }

    if reply.end_session {
        dialogue.exit().await?;
    }
    send_with_retry(&bot, chat_id, reply.text, reply.show_menu.then(main_menu)).await?;

    Ok(())
}

/// Answer to a text message and what happens to the edit session
#[derive(Debug, Clone, PartialEq)]
pub struct TextReply {
    pub text: String,
    pub show_menu: bool,
    /// Return the dialogue to `Idle`
    pub end_session: bool,
}

/// Immediate answer to `step`; for a submitted value this is the interim notice
pub fn step_reply(step: &Step) -> TextReply {
    match step {
        Step::Ignored => TextReply { text: "Use /menu to open the control menu.".to_string(), show_menu: false, end_session: false },
        Step::Expired => {
            TextReply { text: "⌛ Edit session expired. Open ⚙️ Settings to try again.".to_string(), show_menu: true, end_session: true }
        }
        Step::Rejected { field, reason } => TextReply { text: format!("❌ {reason}\n{}", field.prompt()), show_menu: false, end_session: false },
        Step::Submit { field, .. } => TextReply { text: format!("⏳ Saving {}...", field.label()), show_menu: false, end_session: false },
    }
}

/// Answer once the editor is done; a rejected value keeps the session waiting
pub fn edit_reply(field: EditableField, result: &Result<EditOutcome, EditError>) -> TextReply {
    match result {
        Ok(outcome) => TextReply { text: render::render_edit_outcome(field, outcome), show_menu: true, end_session: true },
        Err(EditError::Invalid(err)) => TextReply { text: format!("❌ {err}\n{}", field.prompt()), show_menu: false, end_session: false },
        Err(err) => TextReply { text: format!("❌ {err}"), show_menu: true, end_session: true },
    }
}

#[cfg(test)]
mod tests {
    use at_params::ParameterSet;
    use at_params::StoreError;
    use at_params::ValidationError;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_idle_text_only_hints() {
        let reply = step_reply(&Step::Ignored);
        assert!(reply.text.contains("/menu"));
        assert!(!reply.end_session);
    }

    #[test]
    fn test_expired_session_ends() {
        let reply = step_reply(&Step::Expired);
        assert!(reply.end_session);
        assert!(reply.show_menu);
    }

    #[test]
    fn test_unparseable_value_keeps_waiting() {
        let reply = step_reply(&Step::Rejected { field: EditableField::RsiBuy, reason: "'forty' is not a whole number.".to_string() });
        assert!(!reply.end_session);
        assert!(reply.text.ends_with(EditableField::RsiBuy.prompt()));
    }

    #[test]
    fn test_submit_keeps_session_until_edit_finishes() {
        let reply = step_reply(&Step::Submit { field: EditableField::Stoploss, value: json!(-0.05) });
        assert!(!reply.end_session);
        assert!(reply.text.contains("Stoploss"));
    }

    #[test]
    fn test_invalid_value_keeps_session_and_prompts_again() {
        let err = EditError::Invalid(ValidationError::RsiOrder { rsi_buy: 75, rsi_sell: 70 });
        let reply = edit_reply(EditableField::RsiBuy, &Err(err));
        assert!(!reply.end_session);
        assert!(!reply.show_menu);
        assert!(reply.text.contains("must be lower than rsi_sell"));
        assert!(reply.text.ends_with(EditableField::RsiBuy.prompt()));
    }

    #[test]
    fn test_applied_edit_ends_session() {
        let outcome = EditOutcome::Applied(ParameterSet { rsi_buy: 40, ..ParameterSet::default() });
        let reply = edit_reply(EditableField::RsiBuy, &Ok(outcome));
        assert!(reply.end_session);
        assert!(reply.show_menu);
        assert!(reply.text.contains("set to 40"));
    }

    #[test]
    fn test_unapplied_edit_still_ends_session() {
        let outcome = EditOutcome::SavedNotApplied(ParameterSet::default());
        let reply = edit_reply(EditableField::Stoploss, &Ok(outcome));
        assert!(reply.end_session);
        assert!(reply.text.contains("saved but not applied"));
    }

    #[test]
    fn test_storage_failure_ends_session() {
        let err = EditError::Store(StoreError::Json(serde_json::from_str::<serde_json::Value>("{").unwrap_err()));
        let reply = edit_reply(EditableField::RsiBuy, &Err(err));
        assert!(reply.end_session);
        assert!(reply.text.starts_with("❌ Failed to save parameters"));
    }
}
