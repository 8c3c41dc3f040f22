use crate::bot::command::{help_text, Command};
use crate::domain::errors::AppResult;
use crate::domain::models::{CredentialRecord, UserId};
use crate::storage::CredentialStore;
use crate::trading::{Execution, TradeMode, TradingStates};

const CONFIG_FORMAT: &str =
    "Use the format: /set_config <email> <password> <email_pass> <user_data_dir>";

pub const STATUS_TEXT: &str =
    "Account status: not available yet, broker status checking is not implemented.";

/// Runs chat commands against the credential store and per-user state.
///
/// Every call returns the replies to send, in order. Argument errors become
/// a usage reply; storage failures are returned as errors for the caller to
/// report.
pub struct CommandHandler {
    store: CredentialStore,
    states: TradingStates,
    bot_username: String,
}

impl CommandHandler {
    pub fn new(store: CredentialStore, states: TradingStates) -> Self {
        Self {
            store,
            states,
            bot_username: String::new(),
        }
    }

    /// Only accept `/cmd@name` mentions addressed to this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = username.into();
        self
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn states(&self) -> &TradingStates {
        &self.states
    }

    /// Parse `text` and run it. Non-commands produce no replies.
    pub fn dispatch(&self, user: UserId, text: &str) -> AppResult<Vec<String>> {
        match Command::from_message(text, &self.bot_username) {
            Ok(Some(command)) => self.handle(user, command),
            Ok(None) => Ok(Vec::new()),
            Err(e) => {
                log::info!("Rejected command from user {}: {}", user, e);
                Ok(vec![e.usage().to_string()])
            }
        }
    }

    pub fn handle(&self, user: UserId, command: Command) -> AppResult<Vec<String>> {
        log::info!("User {} sent /{}", user, command.name());

        let replies = match command {
            Command::Start => self.start()?,
            Command::SetConfig {
                email,
                password,
                email_pass,
                user_data_dir,
            } => {
                let record = CredentialRecord::new(email, password, email_pass, user_data_dir);
                self.store.save(&record)?;
                vec!["Configuration updated successfully!".to_string()]
            }
            Command::Help => vec![help_text()],
            Command::ToggleAutoTrade => {
                let enabled = self.states.toggle_auto_trade(user);
                let status = if enabled { "enabled" } else { "disabled" };
                vec![format!("Auto trading has been {}.", status)]
            }
            Command::SetDemoTrade(amount) => {
                self.states.set_demo_trade(user, amount);
                vec![format!("Demo trading set with amount {}.", amount)]
            }
            Command::Trade => self.trade(user),
            Command::Status => vec![STATUS_TEXT.to_string()],
        };

        Ok(replies)
    }

    // Always leaves the store empty, even for an already configured user.
    fn start(&self) -> AppResult<Vec<String>> {
        let had_record = match self.store.load() {
            Ok(state) => state.is_configured(),
            Err(e) => {
                log::warn!("Unreadable settings file will be reset: {}", e);
                true
            }
        };

        if !had_record {
            return Ok(vec![format!(
                "Welcome to the Quotex bot!\nPlease provide your Quotex account details:\n{}",
                CONFIG_FORMAT
            )]);
        }

        self.store.clear()?;
        Ok(vec![format!(
            "Configuration has been reset. Please provide your Quotex account details:\n{}",
            CONFIG_FORMAT
        )])
    }

    fn trade(&self, user: UserId) -> Vec<String> {
        let state = self.states.get(user);

        let mode = match state.trade_mode() {
            TradeMode::Demo { amount } => format!("Demo trading with amount {}.", amount),
            TradeMode::Live => "Live trading started.".to_string(),
        };
        let execution = match state.execution() {
            Execution::Automatic => "Auto trading is enabled.",
            Execution::SignalsOnly => "Auto trading is disabled. Providing signals only.",
        };

        vec![mode, execution.to_string()]
    }
}
