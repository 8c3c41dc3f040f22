// src/main.rs
use quotex_bot::bot::{telegram, CommandHandler};
use quotex_bot::config::Config;
use quotex_bot::domain::errors::{AppError, AppResult};
use quotex_bot::domain::models::ConfigState;
use quotex_bot::exchange::QuotexSession;
use quotex_bot::storage::CredentialStore;
use quotex_bot::trading::TradingStates;

use std::env;
use std::sync::Arc;
use teloxide::prelude::*;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = match env::var("BOT_CONFIG_FILE") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting quotex_bot v{}", env!("CARGO_PKG_VERSION"));

    // Prepare the broker session if credentials were saved earlier
    let store = CredentialStore::new(&config.storage.settings_path);
    match store.load()? {
        ConfigState::Configured(record) => {
            let session = QuotexSession::create(&record);
            log::info!(
                "Quotex session prepared for {} (user data in {})",
                session.email(),
                session.user_data_dir().display()
            );
        }
        ConfigState::Unconfigured => {
            log::info!(
                "No Quotex credentials in {}, waiting for /set_config",
                store.path().display()
            );
        }
    }

    let bot = Bot::new(&config.telegram.bot_token);
    let me = bot
        .get_me()
        .await
        .map_err(|e| AppError::Telegram(format!("Failed to reach Telegram: {}", e)))?;
    log::info!("Telegram bot @{} initialised", me.username());

    let handler = Arc::new(
        CommandHandler::new(store, TradingStates::new()).with_bot_username(me.username()),
    );

    log::info!("Bot is running. Press Ctrl+C to stop.");
    telegram::run(bot, handler).await;

    log::info!("Shutdown complete. Goodbye!");
    Ok(())
}
