use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::handlers::CommandHandler;
use crate::domain::models::UserId;

/// Reply sent when a command fails on our side (e.g. the settings file
/// could not be written)
const FAILURE_TEXT: &str = "Command failed, please try again later.";

/// Handle one incoming message
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    handler: Arc<CommandHandler>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref().map(|u| UserId(u.id.0)) else {
        log::debug!("Ignoring message without sender in chat {}", msg.chat.id);
        return Ok(());
    };

    for reply in dispatch_blocking(handler, user, text.to_string()).await {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

/// Run a command on the blocking pool, since the credential store does
/// file I/O. Failures are logged and turned into `FAILURE_TEXT`.
async fn dispatch_blocking(
    handler: Arc<CommandHandler>,
    user: UserId,
    text: String,
) -> Vec<String> {
    let outcome = tokio::task::spawn_blocking(move || handler.dispatch(user, &text)).await;

    match outcome {
        Ok(Ok(replies)) => replies,
        Ok(Err(err)) => {
            log::error!("Command from user {} failed: {}", user, err);
            vec![FAILURE_TEXT.to_string()]
        }
        Err(err) => {
            log::error!("Command task for user {} did not complete: {}", user, err);
            vec![FAILURE_TEXT.to_string()]
        }
    }
}

/// Poll Telegram and dispatch messages until Ctrl+C
pub async fn run(bot: Bot, handler: Arc<CommandHandler>) {
    let schema = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let handler = handler.clone();
        async move { handle_message(bot, msg, handler).await }
    });

    log::info!("Starting Telegram bot dispatcher...");
    Dispatcher::builder(bot, schema)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
