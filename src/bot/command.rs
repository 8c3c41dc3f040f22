use teloxide::utils::command::{BotCommands, ParseError};

use crate::domain::errors::CommandError;
use crate::domain::models::DemoAmount;

/// Chat commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and reset configuration")]
    Start,

    #[command(
        description = "<email> <password> <email_pass> <user_data_dir> - Set or update account \
                       configuration"
    )]
    #[command(parse_with = "split")]
    SetConfig {
        email: String,
        password: String,
        email_pass: String,
        user_data_dir: String,
    },

    #[command(description = "Get help")]
    Help,

    #[command(description = "Toggle auto trading mode")]
    ToggleAutoTrade,

    #[command(description = "<amount> - Set demo trading mode and amount")]
    #[command(parse_with = parse_demo_amount)]
    SetDemoTrade(DemoAmount),

    #[command(description = "Start a trading session")]
    Trade,

    #[command(description = "Check account status")]
    Status,
}

impl Command {
    /// Parse a message text addressed to `bot_name`.
    ///
    /// `Ok(None)` means the text is not a command for this bot: plain text,
    /// an unknown command, or `/cmd@other_bot`. Commands that take no
    /// arguments ignore any extras.
    pub fn from_message(text: &str, bot_name: &str) -> Result<Option<Command>, CommandError> {
        match <Command as BotCommands>::parse(text, bot_name) {
            Ok(command) => Ok(Some(command)),
            Err(ParseError::UnknownCommand(_)) | Err(ParseError::WrongBotName(_)) => Ok(None),
            // Only /set_config is split into positional fields
            Err(ParseError::TooFewArguments { found, .. })
            | Err(ParseError::TooManyArguments { found, .. }) => {
                Err(CommandError::SetConfigArity(found))
            }
            Err(ParseError::Custom(err)) | Err(ParseError::IncorrectFormat(err)) => {
                match err.downcast::<CommandError>() {
                    Ok(err) => Err(*err),
                    Err(err) => Err(CommandError::InvalidArguments(err.to_string())),
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::SetConfig { .. } => "set_config",
            Command::Help => "help",
            Command::ToggleAutoTrade => "toggle_auto_trade",
            Command::SetDemoTrade(_) => "set_demo_trade",
            Command::Trade => "trade",
            Command::Status => "status",
        }
    }
}

/// Reply to `/help`
pub fn help_text() -> String {
    Command::descriptions().to_string()
}

fn parse_demo_amount(input: String) -> Result<(DemoAmount,), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();
    let error = match args.as_slice() {
        [raw] => match raw.parse::<f64>().ok().and_then(DemoAmount::new) {
            Some(amount) => return Ok((amount,)),
            None => CommandError::InvalidAmount(raw.to_string()),
        },
        _ => CommandError::SetDemoTradeArity(args.len()),
    };

    Err(ParseError::Custom(Box::new(error)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Option<Command>, CommandError> {
        Command::from_message(text, "QuotexBot")
    }

    fn set_config(email: &str, password: &str, email_pass: &str, dir: &str) -> Command {
        Command::SetConfig {
            email: email.to_string(),
            password: password.to_string(),
            email_pass: email_pass.to_string(),
            user_data_dir: dir.to_string(),
        }
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("/start").unwrap(), Some(Command::Start));
        assert_eq!(parse("/help").unwrap(), Some(Command::Help));
        assert_eq!(parse("/trade").unwrap(), Some(Command::Trade));
        assert_eq!(parse("/status").unwrap(), Some(Command::Status));
        assert_eq!(
            parse("/toggle_auto_trade").unwrap(),
            Some(Command::ToggleAutoTrade)
        );
    }

    #[test]
    fn test_extra_arguments_are_ignored_for_plain_commands() {
        assert_eq!(parse("/status now please").unwrap(), Some(Command::Status));
    }

    #[test]
    fn test_command_names_are_exact() {
        assert_eq!(parse("/START").unwrap(), None);
        assert_eq!(parse("/Trade").unwrap(), None);
        assert_eq!(parse("/settings").unwrap(), None);
    }

    #[test]
    fn test_bot_mention_suffix() {
        assert_eq!(parse("/trade@QuotexBot").unwrap(), Some(Command::Trade));
        assert_eq!(parse("/trade@quotexbot").unwrap(), Some(Command::Trade));
        assert_eq!(parse("/trade@SomeOtherBot").unwrap(), None);
    }

    #[test]
    fn test_non_commands_are_ignored() {
        assert_eq!(parse("hello there").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("/unknown arg").unwrap(), None);
    }

    #[test]
    fn test_set_config_requires_four_arguments() {
        assert_eq!(
            parse("/set_config a@b.c pw mailpw /tmp/quotex").unwrap(),
            Some(set_config("a@b.c", "pw", "mailpw", "/tmp/quotex"))
        );
        assert_eq!(
            parse("/set_config a@b.c pw mailpw").unwrap_err(),
            CommandError::SetConfigArity(3)
        );
        assert_eq!(
            parse("/set_config a b c d e").unwrap_err(),
            CommandError::SetConfigArity(5)
        );
        assert!(matches!(
            parse("/set_config"),
            Err(CommandError::SetConfigArity(_))
        ));
    }

    #[test]
    fn test_set_config_keeps_quotes_verbatim() {
        assert_eq!(
            parse(r#"/set_config a@b.c "secret" 'abc' C:\quotex"#).unwrap(),
            Some(set_config("a@b.c", "\"secret\"", "'abc'", r"C:\quotex"))
        );
    }

    #[test]
    fn test_set_demo_trade_amounts() {
        assert_eq!(
            parse("/set_demo_trade 12.5").unwrap(),
            Some(Command::SetDemoTrade(DemoAmount::new(12.5).unwrap()))
        );
        assert_eq!(
            parse("/set_demo_trade 0").unwrap(),
            Some(Command::SetDemoTrade(DemoAmount::new(0.0).unwrap()))
        );
        assert_eq!(
            parse("/set_demo_trade").unwrap_err(),
            CommandError::SetDemoTradeArity(0)
        );
        assert_eq!(
            parse("/set_demo_trade 1 2").unwrap_err(),
            CommandError::SetDemoTradeArity(2)
        );
        for bad in ["abc", "-5", "inf", "NaN"] {
            assert_eq!(
                parse(&format!("/set_demo_trade {}", bad)).unwrap_err(),
                CommandError::InvalidAmount(bad.to_string())
            );
        }
    }

    #[test]
    fn test_usage_lines() {
        assert_eq!(
            CommandError::SetConfigArity(1).usage(),
            "Usage: /set_config <email> <password> <email_pass> <user_data_dir>"
        );
        assert_eq!(
            CommandError::InvalidAmount("x".into()).usage(),
            "Usage: /set_demo_trade <amount>"
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();

        assert!(help.starts_with("Available commands:"));
        for name in [
            "start",
            "set_config",
            "help",
            "toggle_auto_trade",
            "set_demo_trade",
            "trade",
            "status",
        ] {
            assert!(help.contains(&format!("/{}", name)), "{}", name);
        }
    }
}
