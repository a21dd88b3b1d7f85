use std::time::Duration;

use teloxide::ApiError;
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::types::InlineKeyboardMarkup;

/// Send a message, retrying once on rate limiting and transient network errors
pub async fn send_with_retry(bot: &Bot, chat_id: ChatId, text: impl Into<String>, markup: Option<InlineKeyboardMarkup>) -> Result<(), RequestError> {
    let text = text.into();
    let send = || {
        let request = bot.send_message(chat_id, text.clone());
        match markup.clone() {
            Some(markup) => request.reply_markup(markup),
            None => request,
        }
    };

    match send().await {
        Ok(_) => Ok(()),
        Err(RequestError::RetryAfter(seconds)) => {
            tracing::warn!("Rate limited, waiting {seconds:?}");
            tokio::time::sleep(seconds.duration()).await;
            send().await?;
            Ok(())
        }
        Err(RequestError::Network(ref err)) => {
            tracing::error!("Network error: {err}");
            tokio::time::sleep(Duration::from_secs(1)).await;
            send().await?;
            Ok(())
        }
        Err(RequestError::Api(ApiError::BotBlocked)) => {
            tracing::warn!("Bot was blocked by user {chat_id}");
            Ok(())
        }
        Err(RequestError::Api(ApiError::UserDeactivated)) => {
            tracing::warn!("User {chat_id} is deactivated");
            Ok(())
        }
        Err(err) => {
            tracing::error!("Unexpected error sending message: {err}");
            Err(err)
        }
    }
}

/// Replace a menu message in place; an unchanged message is not an error
pub async fn edit_menu(bot: &Bot, message: &Message, text: impl Into<String>, markup: InlineKeyboardMarkup) -> Result<(), RequestError> {
    let text = text.into();
    let edit = || bot.edit_message_text(message.chat.id, message.id, text.clone()).reply_markup(markup.clone());

    let result = match edit().await {
        Err(RequestError::RetryAfter(seconds)) => {
            tracing::warn!("Rate limited while editing menu, waiting {seconds:?}");
            tokio::time::sleep(seconds.duration()).await;
            edit().await
        }
        other => other,
    };

    match result {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(err) => Err(err),
    }
}
